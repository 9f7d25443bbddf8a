pub mod intake;
pub mod myelopathy;
