pub mod md5;

// Re-export MD5 functionality
pub use md5::{
    md5_digest, md5_digest_batch, md5_hex, md5_hex_into, pad_message, padded_len, Digest, Md5,
    MD5_BLOCK_SIZE, MD5_HEX_SIZE, MD5_OUTPUT_SIZE,
};
