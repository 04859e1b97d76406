pub mod partition;
pub mod partition_result;
pub mod work_unit;
