pub mod chunk_buffer;
pub mod still_encoder;
