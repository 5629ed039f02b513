literal_enum!(
    /// Daily attendance mark; one per staff per date, re-marking overwrites
    AttendanceStatus, "status" {
        Present => "PRESENT",
        Absent => "ABSENT",
    }
);

impl Default for AttendanceStatus {
    // Unmarked days read as absent.
    fn default() -> Self {
        AttendanceStatus::Absent
    }
}
