pub mod codebook;
pub mod record;
