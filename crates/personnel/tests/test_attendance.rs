use anyhow::Result;
use chrono::NaiveDate;
use domain::{AttendanceStatus, Gender, LeaveType, StaffId, UnitId};
use personnel::{
    create_default_service, ActionError, AssignInput, AttendanceInput, CreateUnitInput,
    HolidayInput, LeaveInput, Personnel, StaffInput,
};
use tempfile::TempDir;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

struct Roster {
    service: Personnel,
    unit: UnitId,
    other_unit: UnitId,
    staff: Vec<StaffId>,
}

/// Unit "Patrol" with three staff (Mensah, Addo, Owusu) plus a second unit with one more
async fn roster(temp_dir: &TempDir) -> Result<Roster> {
    let service = create_default_service(temp_dir.path().join("test.db")).await?;
    let unit = service
        .org
        .create_unit(CreateUnitInput::new("Patrol").with_roles(["Officer"]))
        .await?;
    let other_unit = service
        .org
        .create_unit(CreateUnitInput::new("Records").with_roles(["Clerk"]))
        .await?;
    let officer = service.org.list_roles(unit).await?[0].id;
    let clerk = service.org.list_roles(other_unit).await?[0].id;

    let mut staff = Vec::new();
    for (i, last) in ["Mensah", "Addo", "Owusu", "Asante"].iter().enumerate() {
        let id = service
            .staff
            .create_staff(StaffInput::new(
                "Ama",
                *last,
                format!("s{i}@x.com"),
                format!("{}", 100 + i),
                Gender::Female,
            ))
            .await?;
        let (role, in_unit) = if i < 3 { (officer, unit) } else { (clerk, other_unit) };
        service
            .assignments
            .assign(AssignInput::new(id, role, in_unit))
            .await?;
        staff.push(id);
    }

    Ok(Roster {
        service,
        unit,
        other_unit,
        staff,
    })
}

#[tokio::test]
async fn test_remarking_overwrites() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let r = roster(&temp_dir).await?;
    let day = date(7, 1);

    let first = r
        .service
        .attendance
        .mark_attendance(AttendanceInput {
            staff_id: r.staff[0],
            date: day,
            status: AttendanceStatus::Absent,
        })
        .await?;
    let second = r
        .service
        .attendance
        .mark_attendance(AttendanceInput {
            staff_id: r.staff[0],
            date: day,
            status: AttendanceStatus::Present,
        })
        .await?;
    assert_eq!(first, second);

    let record = r
        .service
        .attendance
        .get_attendance(r.staff[0], day)
        .await?
        .expect("marked");
    assert_eq!(record.status, AttendanceStatus::Present);
    Ok(())
}

#[tokio::test]
async fn test_sheet_defaults_unmarked_to_absent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let r = roster(&temp_dir).await?;
    let day = date(7, 2);

    r.service
        .attendance
        .mark_attendance(AttendanceInput {
            staff_id: r.staff[0],
            date: day,
            status: AttendanceStatus::Present,
        })
        .await?;

    let sheet = r.service.attendance.unit_attendance(r.unit, day, None).await?;
    let names: Vec<_> = sheet.iter().map(|row| row.staff_name.as_str()).collect();
    assert_eq!(names, vec!["Ama Addo", "Ama Mensah", "Ama Owusu"]);

    let mensah = &sheet[1];
    assert_eq!(mensah.status, AttendanceStatus::Present);
    assert!(mensah.id.is_some());
    assert_eq!(sheet[0].status, AttendanceStatus::Absent);
    assert!(sheet[0].id.is_none());

    let filtered = r
        .service
        .attendance
        .unit_attendance(r.unit, day, Some("owu"))
        .await?;
    assert_eq!(filtered.len(), 1);

    let err = r
        .service
        .attendance
        .unit_attendance(UnitId::new(99), day, None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_sheet_lists_every_assigned_unit_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = create_default_service(temp_dir.path().join("test.db")).await?;
    let day = date(7, 6);

    let patrol = service
        .org
        .create_unit(CreateUnitInput::new("Patrol").with_roles(["Officer"]))
        .await?;
    let traffic = service
        .org
        .create_unit(CreateUnitInput::new("Traffic").with_roles(["Driver", "Marshal"]))
        .await?;
    let officer = service.org.list_roles(patrol).await?[0].id;
    let traffic_roles = service.org.list_roles(traffic).await?;

    let ama = service
        .staff
        .create_staff(StaffInput::new("Ama", "Mensah", "ama@x.com", "100", Gender::Female))
        .await?;
    let first = service
        .assignments
        .assign(AssignInput::new(ama, officer, patrol))
        .await?;
    for role in &traffic_roles {
        service
            .assignments
            .assign(AssignInput::new(ama, role.id, traffic))
            .await?;
    }

    // two roles in Traffic still give one row
    let sheet = service.attendance.unit_attendance(traffic, day, None).await?;
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet[0].staff_id, ama);
    assert_eq!(service.attendance.unit_attendance(patrol, day, None).await?.len(), 1);

    service.assignments.unassign(first).await?;
    assert!(service.attendance.unit_attendance(patrol, day, None).await?.is_empty());
    let sheet = service.attendance.unit_attendance(traffic, day, None).await?;
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet[0].staff_id, ama);
    Ok(())
}

#[tokio::test]
async fn test_batch_reports_failed_rows_and_keeps_the_rest() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let r = roster(&temp_dir).await?;
    let day = date(7, 3);

    let entries = vec![
        (r.staff[0], AttendanceStatus::Present),
        (StaffId::new(999), AttendanceStatus::Present),
        (r.staff[1], AttendanceStatus::Absent),
    ];
    let report = r.service.attendance.save_attendance_batch(day, &entries).await?;

    assert!(!report.is_complete());
    assert_eq!(report.saved, vec![r.staff[0], r.staff[1]]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].staff_id, StaffId::new(999));

    assert!(r
        .service
        .attendance
        .get_attendance(r.staff[1], day)
        .await?
        .is_some());
    Ok(())
}

#[tokio::test]
async fn test_summary_counts_present_absent_and_on_leave() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let r = roster(&temp_dir).await?;
    let day = date(7, 4);

    let entries = vec![
        (r.staff[0], AttendanceStatus::Present),
        (r.staff[1], AttendanceStatus::Absent),
        (r.staff[3], AttendanceStatus::Present),
    ];
    r.service.attendance.save_attendance_batch(day, &entries).await?;

    let leave = r
        .service
        .leaves
        .request_leave(LeaveInput::new(r.staff[2], LeaveType::Annual, date(7, 1)).until(date(7, 10)))
        .await?;
    // pending leave does not count as off duty
    assert_eq!(r.service.attendance.attendance_summary(day, None).await?.off_duty, 0);
    r.service.leaves.approve_leave(leave, None).await?;
    r.service.leaves.start_leave(leave).await?;

    let all = r.service.attendance.attendance_summary(day, None).await?;
    assert_eq!((all.present, all.absent, all.off_duty), (2, 1, 1));

    let patrol = r.service.attendance.attendance_summary(day, Some(r.unit)).await?;
    assert_eq!((patrol.present, patrol.absent, patrol.off_duty), (1, 1, 1));

    let records = r
        .service
        .attendance
        .attendance_summary(day, Some(r.other_unit))
        .await?;
    assert_eq!((records.present, records.absent, records.off_duty), (1, 0, 0));

    let after = r.service.attendance.attendance_summary(date(7, 11), None).await?;
    assert_eq!(after.off_duty, 0);
    Ok(())
}

#[tokio::test]
async fn test_attendance_for_unknown_staff_is_reference() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let r = roster(&temp_dir).await?;

    let err = r
        .service
        .attendance
        .mark_attendance(AttendanceInput {
            staff_id: StaffId::new(404),
            date: date(7, 5),
            status: AttendanceStatus::Present,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Reference { entity: "staff", id: Some(404) }));
    Ok(())
}

#[tokio::test]
async fn test_holiday_range_expands_to_days() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = create_default_service(temp_dir.path().join("test.db")).await?;

    let written = service
        .holidays
        .add_holidays(HolidayInput {
            from: date(12, 24),
            to: Some(date(12, 26)),
            description: "Christmas".into(),
        })
        .await?;
    assert_eq!(written, 3);

    // re-adding a day updates its description
    service
        .holidays
        .add_holidays(HolidayInput {
            from: date(12, 26),
            to: None,
            description: "Boxing Day".into(),
        })
        .await?;

    let listed = service.holidays.list_holidays(Some(date(12, 25)), None).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].description, "Boxing Day");
    assert!(service.holidays.is_holiday(date(12, 24)).await?);

    service.holidays.remove_holiday(date(12, 24)).await?;
    assert!(!service.holidays.is_holiday(date(12, 24)).await?);
    assert!(service
        .holidays
        .remove_holiday(date(12, 24))
        .await
        .unwrap_err()
        .is_not_found());

    let inverted = service
        .holidays
        .add_holidays(HolidayInput {
            from: date(5, 2),
            to: Some(date(5, 1)),
            description: String::new(),
        })
        .await;
    assert!(matches!(inverted, Err(ActionError::Validation(_))));
    Ok(())
}
