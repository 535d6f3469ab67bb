pub mod attendance_check;
pub mod distance;
