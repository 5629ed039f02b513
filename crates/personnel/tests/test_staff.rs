use anyhow::Result;
use domain::{Gender, PageRequest, StaffStatus};
use personnel::{create_default_service, ActionError, ActionState, ConflictKind, Personnel, StaffInput};
use tempfile::TempDir;

fn input(n: u32) -> StaffInput {
    StaffInput::new(
        format!("First{n:02}"),
        format!("Last{n:02}"),
        format!("staff{n:02}@example.com"),
        format!("SN-{n:03}"),
        Gender::Other,
    )
}

async fn seeded(temp_dir: &TempDir, count: u32) -> Result<Personnel> {
    let service = create_default_service(temp_dir.path().join("test.db")).await?;
    for n in 1..=count {
        service.staff.create_staff(input(n)).await?;
    }
    Ok(service)
}

#[tokio::test]
async fn test_twenty_five_staff_paginate_into_three_pages() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = seeded(&temp_dir, 25).await?;

    let first = service.staff.fetch_staff_page("", service.page(1)?).await?;
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.total_count, 25);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].staff_number, "SN-001");
    assert!(first.has_next());

    let third = service.staff.fetch_staff_page("", service.page(3)?).await?;
    assert_eq!(third.items.len(), 5);
    assert_eq!(third.items[0].staff_number, "SN-021");
    assert!(!third.has_next());
    Ok(())
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = seeded(&temp_dir, 12).await?;

    let page = service
        .staff
        .fetch_staff_page("last1", PageRequest::new(1, 10)?)
        .await?;
    // Last10, Last11, Last12
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages, 1);

    let none = service
        .staff
        .fetch_staff_page("zzz", PageRequest::new(1, 10)?)
        .await?;
    assert_eq!(none.total_pages, 0);
    assert!(none.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_and_staff_number() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = seeded(&temp_dir, 1).await?;

    let mut dup_email = input(2);
    dup_email.email = "staff01@example.com".into();
    let err = service.staff.create_staff(dup_email).await.unwrap_err();
    assert!(err.is_conflict(ConflictKind::DuplicateEmail));
    let state = ActionState::from(&err);
    assert_eq!(state.errors.unwrap()["email"], vec!["Email already in use"]);

    let mut dup_number = input(3);
    dup_number.staff_number = "SN-001".into();
    let err = service.staff.create_staff(dup_number).await.unwrap_err();
    assert!(err.is_conflict(ConflictKind::DuplicateStaffNumber));
    Ok(())
}

#[tokio::test]
async fn test_blank_optionals_stored_as_null() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = create_default_service(temp_dir.path().join("test.db")).await?;

    // two staff with blank IPPD numbers must not collide on the unique index
    for n in 1..=2 {
        let mut staff = input(n);
        staff.ippd_number = Some(String::new());
        staff.middle_name = Some("   ".into());
        service.staff.create_staff(staff).await?;
    }

    let found = service.staff.get_staff("SN-002").await?.expect("staff by number");
    assert_eq!(found.ippd_number, None);
    assert_eq!(found.middle_name, None);
    assert_eq!(found.full_name(), "First02 Last02");
    Ok(())
}

#[tokio::test]
async fn test_get_staff_by_id_or_number() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = seeded(&temp_dir, 2).await?;

    let by_id = service.staff.get_staff("2").await?.expect("by id");
    assert_eq!(by_id.staff_number, "SN-002");
    let by_number = service.staff.get_staff("SN-001").await?.expect("by number");
    assert_eq!(by_number.id.get(), 1);
    assert!(service.staff.get_staff("missing").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_update_and_delete() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = seeded(&temp_dir, 1).await?;
    let id = service.staff.get_staff("SN-001").await?.expect("staff").id;

    let mut changed = input(1);
    changed.status = StaffStatus::Sick;
    changed.rank = Some("Sergeant".into());
    service.staff.update_staff(id, changed).await?;

    let staff = service.staff.get_staff("SN-001").await?.expect("staff");
    assert_eq!(staff.status, StaffStatus::Sick);
    assert_eq!(staff.rank.as_deref(), Some("Sergeant"));

    service.staff.delete_staff(id).await?;
    assert!(service.staff.delete_staff(id).await.unwrap_err().is_not_found());
    assert!(matches!(
        service.staff.update_staff(id, input(1)).await,
        Err(ActionError::NotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_list_orders_by_last_then_first_name() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = create_default_service(temp_dir.path().join("test.db")).await?;

    for (first, last, n) in [("Yaw", "Owusu", 1), ("Abena", "Owusu", 2), ("Kojo", "Addo", 3)] {
        let mut staff = input(n);
        staff.first_name = first.into();
        staff.last_name = last.into();
        service.staff.create_staff(staff).await?;
    }

    let names: Vec<_> = service
        .staff
        .list_staff()
        .await?
        .into_iter()
        .map(|s| s.full_name())
        .collect();
    assert_eq!(names, vec!["Kojo Addo", "Abena Owusu", "Yaw Owusu"]);
    Ok(())
}
