// RSA Big Integer Operations
// Wrapper around num-bigint for textbook RSA arithmetic

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::{CryptoRng, RngCore};

use crate::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Miller-Rabin rounds used when sampling primes
pub const MILLER_RABIN_ROUNDS: u32 = 20;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply, rejects a zero modulus
pub fn modexp(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if modulus.is_zero() {
        return Err(RsaError::InvalidModulus);
    }
    if modulus.is_one() {
        return Ok(RsaBigInt::zero());
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    Ok(result)
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let a = BigInt::from_biguint(Sign::Plus, a.clone());
    let m = BigInt::from_biguint(Sign::Plus, m.clone());
    let (gcd, x, _) = extended_gcd(&a, &m);

    if !gcd.abs().is_one() {
        return None;
    }

    // Normalize into [0, m)
    x.mod_floor(&m).to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Uniform random big integer in [0, bound), drawn from a fallible secure source
pub fn random_below<R: RngCore + CryptoRng>(rng: &mut R, bound: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if bound.is_zero() {
        return Err(RsaError::InvalidModulus);
    }

    let bits = bound.bits();
    let byte_len = bits.div_ceil(8) as usize;
    let excess = byte_len as u64 * 8 - bits;
    let mut buf = vec![0u8; byte_len];

    // Rejection sampling keeps the distribution uniform
    loop {
        rng.try_fill_bytes(&mut buf)?;
        let candidate = RsaBigInt::from_bytes_be(&buf) >> excess;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime<R: RngCore + CryptoRng>(
    n: &RsaBigInt,
    iterations: u32,
    rng: &mut R,
) -> RsaResult<bool> {
    if n < &from_u64(2) {
        return Ok(false);
    }

    // Trial division settles every n below 101
    for small in SMALL_PRIMES {
        let small = from_u64(u64::from(small));
        if n == &small {
            return Ok(true);
        }
        if (n % &small).is_zero() {
            return Ok(false);
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let two = from_u64(2);
    let witness_span = n - 3u8;

    'witness: for _ in 0..iterations {
        // Pick random witness a in [2, n-2]
        let a = random_below(rng, &witness_span)? + &two;

        let mut x = modexp(&a, &d, n)?;
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = modexp(&x, &two, n)?;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return Ok(false);
    }

    // Probably prime
    Ok(true)
}

/// Generate a random prime of exactly `bit_length` bits
/// The two top bits are forced so a product of two such primes has full length
pub fn random_prime<R: RngCore + CryptoRng>(bit_length: u32, rng: &mut R) -> RsaResult<RsaBigInt> {
    if bit_length < 2 {
        return Err(RsaError::InvalidKeySize { bits: bit_length, min: 2 });
    }

    let bits = u64::from(bit_length);
    let byte_len = bits.div_ceil(8) as usize;
    let excess = byte_len as u64 * 8 - bits;
    let mut buf = vec![0u8; byte_len];

    loop {
        rng.try_fill_bytes(&mut buf)?;
        let mut candidate = RsaBigInt::from_bytes_be(&buf) >> excess;

        candidate.set_bit(bits - 1, true);
        candidate.set_bit(bits - 2, true);
        // Make it odd
        candidate.set_bit(0, true);

        if is_probable_prime(&candidate, MILLER_RABIN_ROUNDS, rng)? {
            return Ok(candidate);
        }
    }
}
