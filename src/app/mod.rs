pub mod approval;
pub mod dispatch;
pub mod status;
