//! Known-answer tests from FIPS 197 appendix C and NIST SP 800-38A F.1.

use aes_core::{AesDec, AesEnc};
use hex_literal::hex;

fn check(key: &[u8], pt: [u8; 16], ct: [u8; 16]) {
    let enc = AesEnc::new(key).unwrap();
    let dec = AesDec::new(key).unwrap();

    let mut block = pt;
    enc.encrypt_block(&mut block);
    assert_eq!(block, ct);

    dec.decrypt_block(&mut block);
    assert_eq!(block, pt);
}

#[test]
fn fips197_c1_aes128() {
    check(
        &hex!("000102030405060708090a0b0c0d0e0f"),
        hex!("00112233445566778899aabbccddeeff"),
        hex!("69c4e0d86a7b0430d8cdb78070b4c55a"),
    );
}

#[test]
fn fips197_c2_aes192() {
    check(
        &hex!("000102030405060708090a0b0c0d0e0f1011121314151617"),
        hex!("00112233445566778899aabbccddeeff"),
        hex!("dda97ca4864cdfe06eaf70a0ec0d7191"),
    );
}

#[test]
fn fips197_c3_aes256() {
    check(
        &hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"),
        hex!("00112233445566778899aabbccddeeff"),
        hex!("8ea2b7ca516745bfeafc49904b496089"),
    );
}

const SP800_38A_PT: [[u8; 16]; 4] = [
    hex!("6bc1bee22e409f96e93d7e117393172a"),
    hex!("ae2d8a571e03ac9c9eb76fac45af8e51"),
    hex!("30c81c46a35ce411e5fbc1191a0a52ef"),
    hex!("f69f2445df4f9b17ad2b417be66c3710"),
];

#[test]
fn sp800_38a_ecb_aes128() {
    let key = hex!("2b7e151628aed2a6abf7158809cf4f3c");
    let ct: [[u8; 16]; 4] = [
        hex!("3ad77bb40d7a3660a89ecaf32466ef97"),
        hex!("f5d3d58503b9699de785895a96fdbaaf"),
        hex!("43b1cd7f598ece23881b00e3ed030688"),
        hex!("7b0c785e27e8ad3f8223207104725dd4"),
    ];
    for (pt, ct) in SP800_38A_PT.iter().zip(ct.iter()) {
        check(&key, *pt, *ct);
    }
}

#[test]
fn sp800_38a_ecb_aes192() {
    let key = hex!("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b");
    let ct: [[u8; 16]; 4] = [
        hex!("bd334f1d6e45f25ff712a214571fa5cc"),
        hex!("974104846d0ad3ad7734ecb3ecee4eef"),
        hex!("ef7afd2270e2e60adce0ba2face6444e"),
        hex!("9a4b41ba738d6c72fb16691603c18e0e"),
    ];
    for (pt, ct) in SP800_38A_PT.iter().zip(ct.iter()) {
        check(&key, *pt, *ct);
    }
}

#[test]
fn sp800_38a_ecb_aes256() {
    let key = hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4");
    let ct: [[u8; 16]; 4] = [
        hex!("f3eed1bdb5d2a03c064b5a7e3db181f8"),
        hex!("591ccb10d410ed26dc5ba74a31362870"),
        hex!("b6ed21b99ca6f4f9f153e7b1beafed1d"),
        hex!("23304b7a39f9f3ff067d8d8f9e24ecc7"),
    ];
    for (pt, ct) in SP800_38A_PT.iter().zip(ct.iter()) {
        check(&key, *pt, *ct);
    }
}

#[test]
fn rejects_invalid_key_lengths() {
    assert!(AesEnc::new(&[0u8; 15]).is_err());
    assert!(AesEnc::new(&[0u8; 17]).is_err());
    assert!(AesDec::new(&[0u8; 0]).is_err());
    assert!(AesDec::new(&[0u8; 33]).is_err());
}
