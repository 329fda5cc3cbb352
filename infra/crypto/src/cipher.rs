//! AES-256-GCM primitive with detached tag.
//!
//! Both payload formats run the same AEAD; they differ only in where the key
//! comes from. No associated data is bound: the formats authenticate
//! components by storing them alongside the tag-protected ciphertext.

use crate::error::CryptoError;
use crate::kdf::DerivedKey;
use aead::inout::InOutBuf;
use aead::{AeadInOut, Key, KeyInit, Nonce, Tag};
use aes_gcm::Aes256Gcm;
use cvault_domain::{IV_LEN, TAG_LEN};

fn init_cipher(key: &DerivedKey) -> Result<Aes256Gcm, CryptoError> {
    let key = Key::<Aes256Gcm>::try_from(key.as_bytes().as_slice()).map_err(|_| {
        CryptoError::Internal { message: "Invalid derived key length".into(), context: None }
    })?;
    Ok(Aes256Gcm::new(&key))
}

fn build_nonce(iv: &[u8; IV_LEN]) -> Result<Nonce<Aes256Gcm>, CryptoError> {
    iv.as_slice().try_into().map_err(|_| CryptoError::Internal {
        message: "Invalid nonce length".into(),
        context: None,
    })
}

/// Encrypts `plaintext` in place of a copy, returning ciphertext and the
/// 16-byte tag separately.
pub(crate) fn seal(
    key: &DerivedKey,
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN]), CryptoError> {
    let cipher = init_cipher(key)?;
    let nonce = build_nonce(iv)?;

    let mut buf = plaintext.to_vec();
    let tag = cipher
        .encrypt_inout_detached(&nonce, &[], InOutBuf::from(&mut buf[..]))
        .map_err(|_| CryptoError::Internal {
            message: "AEAD encryption failed".into(),
            context: None,
        })?;

    let tag_bytes: [u8; TAG_LEN] = tag.as_slice().try_into().map_err(|_| {
        CryptoError::Internal { message: "Unexpected AEAD tag length".into(), context: None }
    })?;

    Ok((buf, tag_bytes))
}

/// Decrypts `ciphertext`, verifying the detached tag.
///
/// Tag mismatch — tampered data or a wrong key — is a single opaque
/// [`CryptoError::Authentication`]; no partial plaintext ever escapes.
pub(crate) fn open(
    key: &DerivedKey,
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = init_cipher(key)?;
    let nonce = build_nonce(iv)?;

    let tag: Tag<Aes256Gcm> = tag.as_slice().try_into().map_err(|_| CryptoError::Internal {
        message: "Invalid tag length".into(),
        context: None,
    })?;

    let mut buf = ciphertext.to_vec();
    cipher
        .decrypt_inout_detached(&nonce, &[], InOutBuf::from(&mut buf[..]), &tag)
        .map_err(|_| CryptoError::Authentication {
            message: "AEAD tag verification failed".into(),
            context: None,
        })?;

    Ok(buf)
}
