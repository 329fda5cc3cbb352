pub mod fixtures;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cvault_crypto::prelude::*;
use cvault_domain::{CredentialRecord, MasterSecret, Purpose};
use fixtures::*;

#[tokio::test]
async fn versioned_roundtrip_through_record() {
    let cipher = setup_cipher();

    let data = cipher
        .encrypt_with_enterprise(b"SuperSecretPass1", &Purpose::CREDENTIAL_PASSWORD)
        .await
        .expect("Encryption failed");
    assert_eq!(data.key_version, 2, "Active key must be the rotated version");

    let record = CredentialRecord::versioned("cred-1", "svc-account", &data);
    let plaintext = cipher.decrypt(&record).await.expect("Decryption failed");
    assert_eq!(plaintext, b"SuperSecretPass1");
}

#[tokio::test]
async fn legacy_roundtrip_through_record() {
    let cipher = setup_cipher();
    let master = MasterSecret::new(MASTER).unwrap();
    let legacy = LegacyCipher::new(master).encrypt(b"SuperSecretPass1").unwrap();

    let record = CredentialRecord::legacy("cred-1", "svc-account", &legacy);
    let plaintext = cipher.decrypt(&record).await.expect("Decryption failed");
    assert_eq!(plaintext, b"SuperSecretPass1");
}

#[tokio::test]
async fn dispatch_follows_discriminator_not_field_presence() {
    // A migrated row keeps its legacy columns; the discriminator alone must
    // select the versioned path.
    let cipher = setup_cipher();
    let master = MasterSecret::new(MASTER).unwrap();
    let legacy = LegacyCipher::new(master).encrypt(b"SuperSecretPass1").unwrap();

    let mut record = CredentialRecord::legacy("cred-1", "svc-account", &legacy);
    record.is_migrated_to_v2 = true;

    let result = cipher.decrypt(&record).await;
    assert!(
        matches!(result, Err(CryptoError::Argument { .. })),
        "Must demand versioned fields, not fall back to intact legacy columns"
    );
}

#[tokio::test]
async fn tampered_versioned_components_fail_distinctly() {
    let cipher = setup_cipher();
    let data = cipher
        .encrypt_with_enterprise(b"SuperSecretPass1", &Purpose::CREDENTIAL_PASSWORD)
        .await
        .unwrap();

    // Flipped ciphertext or tag bit: authentication failure
    let mut tampered = data.clone();
    tampered.ciphertext[0] ^= 0x01;
    let record = CredentialRecord::versioned("c", "n", &tampered);
    assert!(matches!(cipher.decrypt(&record).await, Err(CryptoError::Authentication { .. })));

    let mut tampered = data.clone();
    tampered.tag[0] ^= 0x01;
    let record = CredentialRecord::versioned("c", "n", &tampered);
    assert!(matches!(cipher.decrypt(&record).await, Err(CryptoError::Authentication { .. })));

    let mut tampered = data.clone();
    tampered.iv[0] ^= 0x01;
    let record = CredentialRecord::versioned("c", "n", &tampered);
    assert!(matches!(cipher.decrypt(&record).await, Err(CryptoError::Authentication { .. })));

    // Truncated tag: size validation, cheaper than a key derivation
    let mut truncated = data.clone();
    truncated.tag.pop();
    let record = CredentialRecord::versioned("c", "n", &truncated);
    assert!(matches!(cipher.decrypt(&record).await, Err(CryptoError::Validation { .. })));

    // Unknown key version: registry drift, not tampering
    let mut drifted = data;
    drifted.key_version = 99;
    let record = CredentialRecord::versioned("c", "n", &drifted);
    assert!(matches!(cipher.decrypt(&record).await, Err(CryptoError::UnknownKey { .. })));
}

#[tokio::test]
async fn can_decrypt_downgrades_every_failure() {
    let cipher = setup_cipher();
    let data = cipher
        .encrypt_with_enterprise(b"SuperSecretPass1", &Purpose::CREDENTIAL_PASSWORD)
        .await
        .unwrap();

    let good = CredentialRecord::versioned("c", "n", &data);
    assert!(cipher.can_decrypt(&good).await);

    let mut tampered = data.clone();
    tampered.ciphertext[0] ^= 0x01;
    assert!(!cipher.can_decrypt(&CredentialRecord::versioned("c", "n", &tampered)).await);

    let mut missing = CredentialRecord::versioned("c", "n", &data);
    missing.enterprise_iv = None;
    assert!(!cipher.can_decrypt(&missing).await);
}

#[tokio::test]
async fn legacy_shaped_bridge_decrypts_text_components() {
    let cipher = setup_cipher();
    let versioned = cipher.versioned();

    let data = versioned.encrypt(b"SuperSecretPass1", &Purpose::CREDENTIAL_PASSWORD).await.unwrap();

    // Re-render the payload the way the intermediate-phase schema stored it:
    // base64 text, tag appended to the ciphertext.
    let mut blob = data.ciphertext.clone();
    blob.extend_from_slice(&data.tag);
    let plaintext = versioned
        .decrypt_legacy_shaped(
            &BASE64.encode(&blob),
            &BASE64.encode(&data.salt),
            &BASE64.encode(&data.iv),
            data.key_id,
            data.key_version,
        )
        .await
        .expect("Bridge decryption failed");

    assert_eq!(plaintext, b"SuperSecretPass1");
}

#[tokio::test]
async fn no_active_key_surfaces_as_configuration_error() {
    let master = MasterSecret::new(MASTER).unwrap();
    let keys =
        KeyManager::new(master.clone(), MemoryKeyRegistry::new(vec![key_record(1, false)]));
    let cipher = DualReadCipher::new(LegacyCipher::new(master), VersionedCipher::new(keys));

    let result =
        cipher.encrypt_with_enterprise(b"anything", &Purpose::CREDENTIAL_PASSWORD).await;
    assert!(matches!(result, Err(CryptoError::NoActiveKey { .. })));
}

#[tokio::test]
async fn unknown_purpose_has_no_active_key() {
    let cipher = setup_cipher();

    let result =
        cipher.encrypt_with_enterprise(b"anything", &Purpose::new("ApiToken")).await;
    assert!(matches!(result, Err(CryptoError::NoActiveKey { .. })));
}
