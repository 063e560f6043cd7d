use jobtrack_core::{Item, ItemDraft, ItemValidationError, Priority, Status};
use serde_json::json;

#[test]
fn draft_defaults_match_add_form() {
    let draft = ItemDraft::default();

    assert_eq!(draft.status, Status::Applied);
    assert_eq!(draft.priority, Priority::Medium);
    assert!(draft.company.is_empty());
    assert!(draft.follow_up.is_empty());
}

#[test]
fn validate_requires_company_and_position() {
    assert_eq!(
        ItemDraft::new("  ", "Engineer").validate(),
        Err(ItemValidationError::MissingCompany)
    );
    assert_eq!(
        ItemDraft::new("Acme", "").validate(),
        Err(ItemValidationError::MissingPosition)
    );
    assert!(ItemDraft::new("Acme", "Engineer").validate().is_ok());
}

#[test]
fn serialization_uses_camel_case_wire_fields() {
    let mut draft = ItemDraft::new("Acme", "Engineer");
    draft.status = Status::PhoneScreen;
    draft.next_step = "Send portfolio".to_string();
    draft.follow_up = "2025-11-06T17:30".to_string();
    draft.priority = Priority::High;
    let item = Item::from_draft("id_abc1234", 1_700_000_000_000, draft);

    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["id"], "id_abc1234");
    assert_eq!(value["createdAt"], 1_700_000_000_000_i64);
    assert_eq!(value["status"], "Phone Screen");
    assert_eq!(value["nextStep"], "Send portfolio");
    assert_eq!(value["followUp"], "2025-11-06T17:30");
    assert_eq!(value["priority"], "High");

    let decoded: Item = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn decoding_is_permissive_about_missing_and_odd_fields() {
    let value = json!({
        "company": "Globex",
        "createdAt": "1700000000000",
        "contact": null,
        "status": "Ghosted",
        "source": "referral"
    });

    let item: Item = serde_json::from_value(value).unwrap();
    assert_eq!(item.id, "");
    assert_eq!(item.company, "Globex");
    assert_eq!(item.position, "");
    assert_eq!(item.contact, "");
    assert_eq!(item.created_at, 1_700_000_000_000);
    assert_eq!(item.status, Status::Unrecognized("Ghosted".to_string()));
    assert_eq!(item.priority, Priority::unset());
    assert_eq!(item.extra["source"], "referral");

    let written = serde_json::to_value(&item).unwrap();
    assert_eq!(written["source"], "referral");
    assert_eq!(written["status"], "Ghosted");
}

#[test]
fn missing_created_at_decodes_as_zero() {
    let item: Item = serde_json::from_value(json!({ "createdAt": null })).unwrap();
    assert_eq!(item.created_at, 0);
}

#[test]
fn mark_done_demotes_interview_and_clears_follow_up() {
    let mut draft = ItemDraft::new("Acme", "Engineer");
    draft.status = Status::Interview;
    draft.follow_up = "2025-11-06T17:30".to_string();
    let mut item = Item::from_draft("id_1", 1, draft);

    item.mark_done();
    assert_eq!(item.status, Status::OnHold);
    assert_eq!(item.follow_up, "");
}

#[test]
fn mark_done_keeps_other_statuses() {
    let mut draft = ItemDraft::new("Acme", "Engineer");
    draft.status = Status::Applied;
    draft.follow_up = "2025-11-06T17:30".to_string();
    draft.notes = "keep me".to_string();
    let mut item = Item::from_draft("id_1", 1, draft);

    item.mark_done();
    assert_eq!(item.status, Status::Applied);
    assert_eq!(item.follow_up, "");
    assert_eq!(item.notes, "keep me");
}

#[test]
fn apply_draft_keeps_identity() {
    let mut item = Item::from_draft("id_keep", 42, ItemDraft::new("Acme", "Engineer"));
    let mut edit = ItemDraft::from_item(&item);
    edit.position = "Staff Engineer".to_string();

    item.apply_draft(edit);
    assert_eq!(item.id, "id_keep");
    assert_eq!(item.created_at, 42);
    assert_eq!(item.position, "Staff Engineer");
}

#[test]
fn badge_slugs_are_lowercase_dashed() {
    assert_eq!(Status::PhoneScreen.slug(), "phone-screen");
    assert_eq!(Status::OnHold.slug(), "on-hold");
    assert_eq!(Priority::High.slug(), "high");
}

#[test]
fn new_items_default_to_applied_and_medium() {
    assert_eq!(Status::default(), Status::Applied);
    assert_eq!(Priority::default(), Priority::Medium);

    let draft = ItemDraft::new("Acme", "Engineer");
    assert_eq!(draft.status, Status::Applied);
    assert_eq!(draft.priority, Priority::Medium);
}
