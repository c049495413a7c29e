//! Property tests for private key sealing

mod common;

use common::fast_options;
use keysmith_key::{KeyEncryptorFactory, KeyError, PrivateKey};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn sealed_keys_open_only_with_their_password(
        key_bytes in prop::collection::vec(any::<u8>(), 32),
        password in "[a-zA-Z0-9]{1,24}",
    ) {
        let encryptor = KeyEncryptorFactory::create(None);
        let key = PrivateKey::from_bytes(key_bytes);

        let locked = encryptor.encrypt_private_key(&key, &password, &fast_options()).unwrap();
        let opened = encryptor.decrypt_private_key(&locked, &password).unwrap();
        prop_assert_eq!(opened, key);

        let wrong = format!("{password}!");
        prop_assert!(matches!(
            encryptor.decrypt_private_key(&locked, &wrong),
            Err(KeyError::Decryption(_))
        ));
    }
}
