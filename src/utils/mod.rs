pub mod conversion;
pub mod input_validation;
