use precip_core::rng::{derive_substream_seed, RngHandle, NOISE_SUBSTREAM, NUCLEATION_SUBSTREAM};
use rand::RngCore;

#[test]
fn rng_emits_reproducible_sequence() {
    let mut rng_a = RngHandle::from_seed(1234);
    let mut rng_b = RngHandle::from_seed(1234);

    let seq_a: Vec<u64> = (0..100).map(|_| rng_a.next_u64()).collect();
    let seq_b: Vec<u64> = (0..100).map(|_| rng_b.next_u64()).collect();

    assert_eq!(seq_a, seq_b);
}

#[test]
fn substreams_are_distinct_and_stable() {
    let noise = derive_substream_seed(77, NOISE_SUBSTREAM);
    let nucleation = derive_substream_seed(77, NUCLEATION_SUBSTREAM);
    assert_ne!(noise, nucleation);
    assert_eq!(noise, derive_substream_seed(77, NOISE_SUBSTREAM));

    let mut a = RngHandle::substream(77, NUCLEATION_SUBSTREAM);
    let mut b = RngHandle::from_seed(nucleation);
    assert_eq!(a.next_u64(), b.next_u64());
}
