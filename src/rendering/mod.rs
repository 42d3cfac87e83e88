pub mod png_codec;

pub use png_codec::{decode_luma, encode_gray8, save_normalized, save_plane};
