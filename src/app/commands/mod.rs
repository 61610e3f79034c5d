pub mod execute;
pub mod scan;
