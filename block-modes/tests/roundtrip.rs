//! Round-trip and streaming-continuation properties.

use block_modes::{tweak_from_sector, CbcDec, CbcEnc, Ctr, Error, Xts};

struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let v = self.next_u64().to_le_bytes();
            let n = chunk.len();
            chunk.copy_from_slice(&v[..n]);
        }
    }
}

#[test]
fn cbc_roundtrip_all_key_sizes() {
    let mut rng = Rng(1);
    for key_len in [16usize, 24, 32] {
        let mut key = [0u8; 32];
        rng.fill(&mut key[..key_len]);
        let mut iv = [0u8; 16];
        rng.fill(&mut iv);

        let mut data = vec![0u8; 33 * 16];
        rng.fill(&mut data);
        let original = data.clone();

        CbcEnc::new(&key[..key_len], &iv)
            .unwrap()
            .encrypt(&mut data);
        assert_ne!(data, original);
        CbcDec::new(&key[..key_len], &iv)
            .unwrap()
            .decrypt(&mut data)
            .unwrap();
        assert_eq!(data, original);
    }
}

#[test]
fn ctr_streaming_splits_match_one_shot() {
    let mut rng = Rng(2);
    let mut key = [0u8; 32];
    rng.fill(&mut key);
    let mut iv = [0u8; 16];
    rng.fill(&mut iv);

    let mut data = vec![0u8; 301];
    rng.fill(&mut data);

    let mut one_shot = data.clone();
    Ctr::new(&key, &iv).unwrap().apply_keystream(&mut one_shot);

    // Chunk sizes chosen to land mid-block repeatedly.
    for splits in [&[1usize, 15, 16, 17, 252][..], &[7, 7, 7, 280][..], &[300, 1][..]] {
        let mut streamed = data.clone();
        let mut ctr = Ctr::new(&key, &iv).unwrap();
        let mut off = 0;
        for &n in splits {
            ctr.apply_keystream(&mut streamed[off..off + n]);
            off += n;
        }
        assert_eq!(off, data.len());
        assert_eq!(streamed, one_shot, "splits {splits:?}");
    }
}

#[test]
fn ctr_counter_wraps_at_the_end_of_the_register() {
    let key = [3u8; 16];
    let iv = [0xffu8; 16];
    let mut data = [0u8; 48];
    let mut ctr = Ctr::new(&key, &iv).unwrap();
    // Must not panic crossing the all-ones boundary.
    ctr.apply_keystream(&mut data);
    assert_ne!(data, [0u8; 48]);
}

#[test]
fn xts_roundtrip_including_stealing_lengths() {
    let mut rng = Rng(4);
    for key_len in [16usize, 32] {
        let mut data_key = [0u8; 32];
        let mut tweak_key = [0u8; 32];
        rng.fill(&mut data_key[..key_len]);
        rng.fill(&mut tweak_key[..key_len]);
        let xts = Xts::new(&data_key[..key_len], &tweak_key[..key_len]).unwrap();

        for len in [16usize, 17, 31, 32, 33, 512] {
            let tweak = tweak_from_sector(rng.next_u64());
            let mut buf = vec![0u8; len];
            rng.fill(&mut buf);
            let original = buf.clone();

            xts.encrypt_sector(&tweak, &mut buf).unwrap();
            assert_ne!(buf, original, "len {len}");
            xts.decrypt_sector(&tweak, &mut buf).unwrap();
            assert_eq!(buf, original, "len {len}");
        }
    }
}

#[test]
fn xts_stealing_output_length_equals_input_length() {
    // The first 16 bytes of a 17-byte sector must differ from the first
    // block of the same data encrypted as a 16-byte sector: stealing
    // re-positions the last full block.
    let xts = Xts::new(&[5u8; 16], &[6u8; 16]).unwrap();
    let tweak = tweak_from_sector(9);

    let mut short = [0x11u8; 16];
    xts.encrypt_sector(&tweak, &mut short).unwrap();

    let mut long = [0x11u8; 17];
    xts.encrypt_sector(&tweak, &mut long).unwrap();

    assert_ne!(&long[..16], &short[..]);
}

#[test]
fn xts_rejects_sub_block_input() {
    let xts = Xts::new(&[0u8; 16], &[1u8; 16]).unwrap();
    let tweak = tweak_from_sector(0);
    let mut buf = [0u8; 15];
    assert_eq!(
        xts.encrypt_sector(&tweak, &mut buf),
        Err(Error::InvalidLength)
    );
    assert_eq!(
        xts.decrypt_sector(&tweak, &mut buf),
        Err(Error::InvalidLength)
    );
}

#[test]
fn xts_different_sectors_differ() {
    let xts = Xts::new(&[7u8; 32], &[8u8; 32]).unwrap();
    let mut a = [0u8; 64];
    let mut b = [0u8; 64];
    xts.encrypt_sector(&tweak_from_sector(1), &mut a).unwrap();
    xts.encrypt_sector(&tweak_from_sector(2), &mut b).unwrap();
    assert_ne!(a, b);
}
