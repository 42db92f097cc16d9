use super::*;

fn ann() -> UserRecord {
    UserRecord::new(UserId(1), UserFields::new("Ann", "a@x.com", "Metropolis"))
}

fn fill(form: &mut FormCoordinator, name: &str, email: &str, city: &str) {
    form.set_field(DraftField::Name, name);
    form.set_field(DraftField::Email, email);
    form.set_field(DraftField::City, city);
}

#[test]
fn starts_in_create_mode() {
    let form = FormCoordinator::new();
    assert_eq!(form.mode(), FormMode::Create);
    assert_eq!(form.draft(), &Draft::default());
}

#[test]
fn create_submission_carries_fields() {
    let mut form = FormCoordinator::new();
    fill(&mut form, "Alice", "alice@x.com", "Paris");
    assert_eq!(
        form.prepare_submit().expect("valid"),
        Submission::Create(UserFields::new("Alice", "alice@x.com", "Paris"))
    );
}

#[test]
fn create_submission_validates() {
    let mut form = FormCoordinator::new();
    fill(&mut form, "Al", "al@x.com", "Paris");
    assert_eq!(
        form.prepare_submit().expect_err("short name"),
        DashboardError::validation("Name must be greater than 3 characters")
    );
}

#[test]
fn begin_edit_copies_record_with_string_id() {
    let mut form = FormCoordinator::new();
    form.begin_edit(&ann());
    assert_eq!(form.mode(), FormMode::Edit);
    assert_eq!(form.draft().id, "1");
    assert_eq!(form.draft().city, "Metropolis");
}

#[test]
fn edit_submission_targets_draft_id() {
    let mut form = FormCoordinator::new();
    form.begin_edit(&ann());
    fill(&mut form, "Annie", "a@x.com", "Gotham");
    assert_eq!(
        form.prepare_submit().expect("valid"),
        Submission::Update {
            id: UserId(1),
            fields: UserFields::new("Annie", "a@x.com", "Gotham"),
        }
    );
}

#[test]
fn clearing_id_returns_to_create_mode() {
    let mut form = FormCoordinator::new();
    form.begin_edit(&ann());
    form.set_field(DraftField::Name, "Annabel");
    form.clear_id();
    assert_eq!(form.mode(), FormMode::Create);
    assert!(matches!(
        form.prepare_submit().expect("valid"),
        Submission::Create(_)
    ));
}

#[test]
fn update_requires_a_selected_user() {
    let mut form = FormCoordinator::new();
    fill(&mut form, "Alice", "alice@x.com", "Paris");
    assert_eq!(
        form.prepare_update().expect_err("nothing selected"),
        DashboardError::validation("Please select a user to update")
    );
}

#[test]
fn starting_another_edit_discards_changes() {
    let mut form = FormCoordinator::new();
    form.begin_edit(&ann());
    form.set_field(DraftField::City, "Gotham");
    let bob = UserRecord::new(UserId(2), UserFields::new("Bobby", "b@x.com", "Star City"));
    form.begin_edit(&bob);
    assert_eq!(form.draft().id, "2");
    assert_eq!(form.draft().city, "Star City");
}

#[test]
fn reset_clears_everything() {
    let mut form = FormCoordinator::new();
    form.begin_edit(&ann());
    form.reset();
    assert_eq!(form.draft(), &Draft::default());
}
