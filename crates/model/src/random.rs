//! Position hashing and the pseudo-random generators the clients seed from it.

/// Java `int` view of a block coordinate. Upper bits are discarded, as the
/// client stores coordinates in 32 bits.
#[inline]
fn as_client_int(v: i64) -> i32 {
    v as i32
}

/// Coordinate hash shared by every mode, before the final shift.
#[inline]
pub fn coordinate_hash(x: i64, y: i64, z: i64) -> i64 {
    let (x, y, z) = (as_client_int(x), as_client_int(y), as_client_int(z));
    let mut l = i64::from(x.wrapping_mul(3_129_871))
        ^ i64::from(z).wrapping_mul(116_129_781)
        ^ i64::from(y);
    l = l
        .wrapping_mul(l)
        .wrapping_mul(42_317_861)
        .wrapping_add(l.wrapping_mul(11));
    l
}

/// Per-block model seed: the coordinate hash shifted down 16 bits (arithmetic).
#[inline]
pub fn position_seed(x: i64, y: i64, z: i64) -> i64 {
    coordinate_hash(x, y, z) >> 16
}

const LCG_MULTIPLIER: i64 = 0x5_DEEC_E66D;
const LCG_ADDEND: i64 = 0xB;
const LCG_MASK: i64 = (1 << 48) - 1;

/// 48-bit linear congruential generator with `java.util.Random` semantics.
#[derive(Debug, Clone)]
pub struct JavaRandom {
    state: i64,
}

impl JavaRandom {
    pub fn new(seed: i64) -> Self {
        Self {
            state: (seed ^ LCG_MULTIPLIER) & LCG_MASK,
        }
    }

    /// Next `bits` (1..=32) high bits of the state, as a signed int.
    #[inline]
    pub fn next_bits(&mut self, bits: u32) -> i32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_ADDEND)
            & LCG_MASK;
        ((self.state as u64) >> (48 - bits)) as i32
    }

    #[inline]
    pub fn next_long(&mut self) -> i64 {
        let hi = i64::from(self.next_bits(32));
        let lo = i64::from(self.next_bits(32));
        (hi << 32).wrapping_add(lo)
    }

    /// Uniform value in `0..bound`. `bound` must be positive.
    pub fn next_int_bounded(&mut self, bound: i32) -> i32 {
        debug_assert!(bound > 0);
        if bound & bound.wrapping_neg() == bound {
            return ((i64::from(bound) * i64::from(self.next_bits(31))) >> 31) as i32;
        }
        loop {
            let bits = self.next_bits(31);
            let val = bits % bound;
            if bits.wrapping_sub(val).wrapping_add(bound - 1) >= 0 {
                return val;
            }
        }
    }
}

const GOLDEN_RATIO_64: u64 = 0x9E37_79B9_7F4A_7C15;

/// Stafford variant 13 finalizer, the output stage of splitmix64.
#[inline]
pub fn mix_stafford13(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// 64-bit MurmurHash3 finalizer (`fmix64`).
#[inline]
pub fn murmur_hash3(mut x: u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    x = x.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    x ^ (x >> 33)
}

/// splitmix64 whose seed is scrambled through [`murmur_hash3`] first.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: i64) -> Self {
        Self {
            state: murmur_hash3(seed as u64),
        }
    }

    #[inline]
    pub fn next_long(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_RATIO_64);
        mix_stafford13(self.state)
    }
}

/// Xoroshiro128+ (rotations 24/16/37), the generator Sodium renders block
/// models with. Both state words come from a [`SplitMix64`] on the seed.
#[derive(Debug, Clone)]
pub struct Xoroshiro128Plus {
    s0: u64,
    s1: u64,
}

impl Xoroshiro128Plus {
    pub fn from_seed(seed: i64) -> Self {
        let mut mixer = SplitMix64::new(seed);
        let s0 = mixer.next_long();
        let s1 = mixer.next_long();
        Self { s0, s1 }
    }

    #[inline]
    pub fn next_long(&mut self) -> i64 {
        let s0 = self.s0;
        let mut s1 = self.s1;
        let result = s0.wrapping_add(s1);
        s1 ^= s0;
        self.s0 = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.s1 = s1.rotate_left(37);
        result as i64
    }

    /// Uniform value in `0..bound`. Powers of two take the high bits of one
    /// draw; other bounds reject on signed overflow of `u + bound - 1 - r`.
    pub fn next_long_bounded(&mut self, bound: i64) -> i64 {
        debug_assert!(bound > 0);
        let t = self.next_long();
        let bound_minus_1 = bound - 1;
        if bound & bound_minus_1 == 0 {
            let shift = bound_minus_1.leading_zeros();
            return (t as u64).checked_shr(shift).unwrap_or(0) as i64 & bound_minus_1;
        }
        let mut u = ((t as u64) >> 1) as i64;
        loop {
            let r = u % bound;
            if u.wrapping_add(bound_minus_1).wrapping_sub(r) >= 0 {
                return r;
            }
            u = ((self.next_long() as u64) >> 1) as i64;
        }
    }

    pub fn next_int_bounded(&mut self, bound: i32) -> i32 {
        self.next_long_bounded(i64::from(bound)) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_random_matches_known_sequence() {
        // new java.util.Random(42).nextLong()
        assert_eq!(JavaRandom::new(42).next_long(), -5_025_562_857_975_149_833);
        assert_eq!(JavaRandom::new(0).next_int_bounded(4), 2);
    }

    #[test]
    fn coordinate_hash_known_values() {
        assert_eq!(coordinate_hash(0, 0, 0), 0);
        assert_eq!(coordinate_hash(1, 64, -1), 3_347_287_841_516_340_540);
        assert_eq!(coordinate_hash(-7, 3, 12), -9_082_684_472_523_184_328);
        assert_eq!(position_seed(1, 64, -1), 51_075_559_105_168);
        assert_eq!(position_seed(-7, 3, 12), -138_590_766_487_476);
    }

    #[test]
    fn coordinates_truncate_to_client_ints() {
        let wide = (1_i64 << 32) + 5;
        assert_eq!(coordinate_hash(wide, 0, 0), coordinate_hash(5, 0, 0));
        assert_eq!(position_seed(i64::MIN, i64::MAX, -1), position_seed(0, -1, -1));
    }

    #[test]
    fn splitmix_from_zero_matches_reference_stream() {
        // murmur_hash3(0) == 0, so this is plain splitmix64 seeded with 0.
        let mut mixer = SplitMix64::new(0);
        assert_eq!(mixer.next_long(), 0xE220_A839_7B1D_CDAF);
        assert_eq!(murmur_hash3(1) as i64, -5_451_962_507_482_445_012);
    }

    #[test]
    fn xoroshiro_plus_known_sequence() {
        let mut rng = Xoroshiro128Plus::from_seed(0);
        assert_eq!(rng.next_long(), 5_807_750_865_143_411_619);
        assert_eq!(rng.next_long(), -2_880_618_569_221_778_578);
        assert_eq!(Xoroshiro128Plus::from_seed(12345).next_long(), 6_263_538_168_707_923_351);
    }

    #[test]
    fn xoroshiro_power_of_two_bound_takes_high_bits() {
        let raw = Xoroshiro128Plus::from_seed(77).next_long();
        let bounded = Xoroshiro128Plus::from_seed(77).next_int_bounded(4);
        assert_eq!(i64::from(bounded), ((raw as u64) >> 62) as i64);
    }

    #[test]
    fn xoroshiro_bound_of_one_is_zero() {
        assert_eq!(Xoroshiro128Plus::from_seed(5).next_int_bounded(1), 0);
    }

    #[test]
    fn xoroshiro_bounded_stays_in_range() {
        let mut rng = Xoroshiro128Plus::from_seed(12345);
        for _ in 0..1000 {
            let v = rng.next_int_bounded(7);
            assert!((0..7).contains(&v));
        }
    }

    #[test]
    fn java_bounded_non_power_of_two_stays_in_range() {
        let mut rng = JavaRandom::new(-99);
        for _ in 0..1000 {
            let v = rng.next_int_bounded(10);
            assert!((0..10).contains(&v));
        }
    }

    #[test]
    fn mix_is_splitmix_finalizer() {
        assert_eq!(mix_stafford13(0), 0);
        assert_ne!(mix_stafford13(1), 1);
    }
}
