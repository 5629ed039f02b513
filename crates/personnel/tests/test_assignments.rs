use anyhow::Result;
use chrono::{Local, NaiveDate};
use domain::{Gender, RoleId, StaffId, UnitId};
use personnel::{
    create_default_service, ActionError, ActionState, AssignInput, ConflictKind, CreateUnitInput,
    Personnel, StaffInput,
};
use tempfile::TempDir;

struct Fixture {
    service: Personnel,
    _temp_dir: TempDir,
    hq: UnitId,
    patrol: UnitId,
    commander: RoleId,
    officer: RoleId,
}

async fn fixture() -> Result<Fixture> {
    let temp_dir = TempDir::new()?;
    let service = create_default_service(temp_dir.path().join("test.db")).await?;

    let hq = service
        .org
        .create_unit(CreateUnitInput::new("HQ").with_roles(["Commander", "Deputy"]))
        .await?;
    let patrol = service
        .org
        .create_unit(CreateUnitInput::new("Patrol").under(hq).with_roles(["Officer"]))
        .await?;
    let commander = service.org.list_roles(hq).await?[0].id;
    let officer = service.org.list_roles(patrol).await?[0].id;

    Ok(Fixture {
        service,
        _temp_dir: temp_dir,
        hq,
        patrol,
        commander,
        officer,
    })
}

async fn staff(service: &Personnel, email: &str, number: &str, last: &str) -> Result<StaffId> {
    Ok(service
        .staff
        .create_staff(StaffInput::new("Ama", last, email, number, Gender::Female))
        .await?)
}

#[tokio::test]
async fn test_assign_duplicate_unassign_scenario() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;

    let id = f
        .service
        .assignments
        .assign(AssignInput::new(a, f.officer, f.patrol))
        .await?;

    let listed = f.service.assignments.list_assignments(f.patrol).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].assignment.id, id);
    assert_eq!(listed[0].assignment.start_date, Local::now().date_naive());
    assert_eq!(listed[0].assignment.end_date, None);
    assert_eq!(listed[0].role_title, "Officer");
    assert_eq!(listed[0].email, "a@x.com");

    let err = f
        .service
        .assignments
        .assign(AssignInput::new(a, f.officer, f.patrol))
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::DuplicateAssignment));
    assert_eq!(
        ActionState::from(&err).state_error.as_deref(),
        Some("This assignment already exists.")
    );
    assert_eq!(f.service.assignments.list_assignments(f.patrol).await?.len(), 1);

    f.service.assignments.unassign(id).await?;
    assert!(f.service.assignments.list_assignments(f.patrol).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unassign_missing_is_not_found() -> Result<()> {
    let f = fixture().await?;
    let err = f
        .service
        .assignments
        .unassign(domain::AssignmentId::new(404))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_assign_requires_every_id() -> Result<()> {
    let f = fixture().await?;
    let err = f
        .service
        .assignments
        .assign(AssignInput {
            staff_id: None,
            role_id: Some(f.officer),
            unit_id: Some(f.patrol),
        })
        .await
        .unwrap_err();
    match err {
        ActionError::Validation(errors) => assert_eq!(errors["staff_id"], vec!["Staff is required"]),
        other => panic!("expected validation error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_assign_unknown_references() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;

    let err = f
        .service
        .assignments
        .assign(AssignInput::new(StaffId::new(999), f.officer, f.patrol))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Reference { entity: "staff", .. }));

    let err = f
        .service
        .assignments
        .assign(AssignInput::new(a, RoleId::new(999), f.patrol))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Reference { entity: "role", .. }));

    let err = f
        .service
        .assignments
        .assign(AssignInput::new(a, f.commander, f.patrol))
        .await
        .unwrap_err();
    match err {
        ActionError::Validation(errors) => assert!(errors.contains_key("role_id")),
        other => panic!("expected validation error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_staff_assignments_are_all_primary_oldest_first() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;
    let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();

    f.service
        .assignments
        .assign_on(AssignInput::new(a, f.commander, f.hq), day(20))
        .await?;
    f.service
        .assignments
        .assign_on(AssignInput::new(a, f.officer, f.patrol), day(2))
        .await?;

    let held = f.service.assignments.staff_assignments(a).await?;
    assert_eq!(held.len(), 2);
    assert_eq!(held[0].assignment.unit_id, f.patrol);
    assert_eq!(held[1].assignment.unit_id, f.hq);
    assert!(held.iter().all(|d| d.assignment.is_primary));
    Ok(())
}

#[tokio::test]
async fn test_deleting_staff_cascades_assignments() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;
    let b = staff(&f.service, "b@x.com", "101", "Owusu").await?;

    for who in [a, b] {
        f.service
            .assignments
            .assign(AssignInput::new(who, f.officer, f.patrol))
            .await?;
    }
    f.service
        .assignments
        .assign(AssignInput::new(a, f.commander, f.hq))
        .await?;

    f.service.staff.delete_staff(a).await?;

    let patrol = f.service.assignments.list_assignments(f.patrol).await?;
    assert_eq!(patrol.len(), 1);
    assert_eq!(patrol[0].assignment.staff_id, b);
    assert!(f.service.assignments.list_assignments(f.hq).await?.is_empty());
    assert!(f.service.assignments.staff_assignments(a).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_deleting_unit_cascades_roles_and_assignments() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;
    f.service
        .assignments
        .assign(AssignInput::new(a, f.officer, f.patrol))
        .await?;

    f.service.org.delete_unit(f.patrol).await?;
    assert!(f.service.assignments.staff_assignments(a).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_list_orders_by_start_date_desc() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;
    let b = staff(&f.service, "b@x.com", "101", "Owusu").await?;
    let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();

    let older = f
        .service
        .assignments
        .assign_on(AssignInput::new(a, f.officer, f.patrol), day(1))
        .await?;
    let newer = f
        .service
        .assignments
        .assign_on(AssignInput::new(b, f.officer, f.patrol), day(15))
        .await?;

    let ids: Vec<_> = f
        .service
        .assignments
        .list_assignments(f.patrol)
        .await?
        .into_iter()
        .map(|d| d.assignment.id)
        .collect();
    assert_eq!(ids, vec![newer, older]);
    Ok(())
}

#[tokio::test]
async fn test_search_spans_units() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;
    let b = staff(&f.service, "b@x.com", "200", "Owusu").await?;
    f.service
        .assignments
        .assign(AssignInput::new(a, f.officer, f.patrol))
        .await?;
    f.service
        .assignments
        .assign(AssignInput::new(b, f.commander, f.hq))
        .await?;

    let found = f.service.assignments.search_assignments("mensah").await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].assignment.staff_id, a);

    let found = f.service.assignments.search_assignments("command").await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].assignment.staff_id, b);

    assert_eq!(f.service.assignments.search_assignments("").await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_end_assignment_rejects_date_before_start() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;
    let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let id = f
        .service
        .assignments
        .assign_on(AssignInput::new(a, f.officer, f.patrol), start)
        .await?;

    let early = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert!(matches!(
        f.service.assignments.end_assignment(id, Some(early)).await,
        Err(ActionError::Validation(_))
    ));

    let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    f.service.assignments.end_assignment(id, Some(end)).await?;
    let listed = f.service.assignments.list_assignments(f.patrol).await?;
    assert_eq!(listed[0].assignment.end_date, Some(end));
    Ok(())
}

#[tokio::test]
async fn test_coverage_counts_roles_and_assignments() -> Result<()> {
    let f = fixture().await?;
    let a = staff(&f.service, "a@x.com", "100", "Mensah").await?;
    let b = staff(&f.service, "b@x.com", "101", "Owusu").await?;
    for who in [a, b] {
        f.service
            .assignments
            .assign(AssignInput::new(who, f.officer, f.patrol))
            .await?;
    }

    let all = f.service.assignments.assignment_coverage(None).await?;
    assert_eq!(all.len(), 2);
    let hq = &all[0];
    assert_eq!((hq.role_count, hq.filled_roles, hq.assignment_count), (2, 0, 0));
    assert_eq!(hq.vacant_roles(), 2);
    let patrol = &all[1];
    assert_eq!((patrol.role_count, patrol.filled_roles, patrol.assignment_count), (1, 1, 2));

    let subtree = f.service.assignments.assignment_coverage(Some(f.patrol)).await?;
    assert_eq!(subtree.len(), 1);
    assert_eq!(subtree[0].unit_id, f.patrol);

    assert!(f
        .service
        .assignments
        .assignment_coverage(Some(UnitId::new(77)))
        .await
        .unwrap_err()
        .is_not_found());
    Ok(())
}
