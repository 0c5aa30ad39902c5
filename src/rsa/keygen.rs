// RSA Key Generation
// Implements textbook RSA key pair generation with a fixed public exponent

use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use super::bigint::{from_u64, gcd, mod_inverse, random_prime, RsaBigInt};
use crate::error::{RsaError, RsaResult};

/// Public exponent used for every generated key
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Smallest modulus size that still splits into two usable primes
pub const MIN_KEY_BITS: u32 = 16;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: RsaBigInt, // Modulus
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub public: RsaPublicKey,
    pub d: RsaBigInt,           // Private exponent
    pub primes: [RsaBigInt; 2], // p and q, in sampling order
}

impl RsaPublicKey {
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Self {
        Self { n, e }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt a message using this public key
    pub fn encrypt(&self, plaintext: &[u8]) -> RsaResult<RsaBigInt> {
        super::encrypt::encrypt_bytes(plaintext, self)
    }
}

impl RsaPrivateKey {
    /// The matching public half
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.public.bit_length()
    }

    /// Totient (p-1)(q-1) of the recorded primes
    pub fn totient(&self) -> RsaBigInt {
        totient(&self.primes[0], &self.primes[1])
    }

    /// Decrypt a ciphertext integer back to message bytes
    pub fn decrypt(&self, ciphertext: &RsaBigInt) -> RsaResult<Vec<u8>> {
        super::decrypt::decrypt_bytes(ciphertext, self)
    }
}

fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}

/// Generate an RSA key pair whose modulus has `bit_length` bits
/// Draws its primes from the operating system's secure random source
pub fn generate_key_pair(bit_length: u32) -> RsaResult<RsaPrivateKey> {
    generate_key_pair_with_rng(bit_length, &mut OsRng)
}

/// Generate an RSA key pair from the supplied secure random source
pub fn generate_key_pair_with_rng<R: RngCore + CryptoRng>(
    bit_length: u32,
    rng: &mut R,
) -> RsaResult<RsaPrivateKey> {
    if bit_length < MIN_KEY_BITS || bit_length % 2 != 0 {
        return Err(RsaError::InvalidKeySize {
            bits: bit_length,
            min: MIN_KEY_BITS,
        });
    }

    let half_bits = bit_length / 2;

    // Step 1: Sample two distinct primes, redrawing both on a collision
    let (p, q) = loop {
        let p = random_prime(half_bits, rng)?;
        let q = random_prime(half_bits, rng)?;
        if p != q {
            break (p, q);
        }
        tracing::debug!("sampled equal primes, resampling both");
    };

    key_pair_from_primes(p, q)
}

/// Build a key pair from two distinct primes
/// Fails when the fixed public exponent has no inverse modulo (p-1)(q-1)
pub fn key_pair_from_primes(p: RsaBigInt, q: RsaBigInt) -> RsaResult<RsaPrivateKey> {
    // Step 2: Compute n = p * q
    let n = &p * &q;

    // Step 3: Compute λ = (p-1)(q-1)
    let lambda = totient(&p, &q);

    // Step 4: Fixed public exponent, no fallback to another value
    let e = from_u64(PUBLIC_EXPONENT);
    if !gcd(&e, &lambda).is_one() {
        return Err(RsaError::KeyGeneration(format!(
            "e={} is not coprime with the totient",
            e
        )));
    }

    // Step 5: Compute d = e^(-1) mod λ
    let d = mod_inverse(&e, &lambda).ok_or_else(|| {
        RsaError::KeyGeneration("failed to compute modular inverse".to_string())
    })?;

    tracing::debug!(bits = n.bits(), "generated key pair");

    Ok(RsaPrivateKey {
        public: RsaPublicKey { n, e },
        d,
        primes: [p, q],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::is_probable_prime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {}

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source offline"))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn test_key_generation() {
        let key = generate_key_pair(512).unwrap();

        assert_eq!(key.bit_length(), 512);
        assert_eq!(key.public.e, from_u64(PUBLIC_EXPONENT));
        assert!(key.d > from_u64(0));
    }

    #[test]
    fn test_key_properties() {
        for _ in 0..5 {
            let key = generate_key_pair(128).unwrap();
            let [p, q] = &key.primes;

            // Verify n = p * q with p != q, both prime
            assert_ne!(p, q);
            assert_eq!(key.public.n, p * q);
            assert!(is_probable_prime(p, 20, &mut OsRng).unwrap());
            assert!(is_probable_prime(q, 20, &mut OsRng).unwrap());

            // Verify e * d ≡ 1 (mod λ)
            let product = &key.public.e * &key.d;
            assert_eq!(product % key.totient(), from_u64(1));
        }
    }

    #[test]
    fn test_minimum_key_size() {
        let key = generate_key_pair(MIN_KEY_BITS).unwrap();
        assert_eq!(key.bit_length(), u64::from(MIN_KEY_BITS));
        assert_ne!(key.primes[0], key.primes[1]);
    }

    #[test]
    fn test_invalid_key_sizes() {
        assert!(matches!(
            generate_key_pair(8),
            Err(RsaError::InvalidKeySize { bits: 8, .. })
        ));
        assert!(matches!(
            generate_key_pair(65),
            Err(RsaError::InvalidKeySize { bits: 65, .. })
        ));
    }

    #[test]
    fn test_key_pair_from_primes() {
        // 61 * 53: λ = 3120, 65537 ≡ 17 (mod 3120), d = 2753
        let key = key_pair_from_primes(from_u64(61), from_u64(53)).unwrap();
        assert_eq!(key.public.n, from_u64(3233));
        assert_eq!(key.public.e, from_u64(PUBLIC_EXPONENT));
        assert_eq!(key.d, from_u64(2753));
        assert_eq!(key.primes, [from_u64(61), from_u64(53)]);
    }

    #[test]
    fn test_exponent_not_coprime_fails() {
        // 917519 = 65537 * 14 + 1, so 65537 divides p - 1
        let result = key_pair_from_primes(from_u64(917_519), from_u64(1_000_003));

        match result {
            Err(RsaError::KeyGeneration(reason)) => {
                assert!(reason.contains(&PUBLIC_EXPONENT.to_string()));
            }
            other => panic!("expected KeyGeneration error, got {:?}", other),
        }
    }

    #[test]
    fn test_random_source_failure() {
        let result = generate_key_pair_with_rng(64, &mut FailingRng);
        assert!(matches!(result, Err(RsaError::RandomSource(_))));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_key_pair_with_rng(128, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_key_pair_with_rng(128, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_encrypt_decrypt() {
        let key = generate_key_pair(256).unwrap();
        let message = b"Hello, RSA!";

        let ciphertext = key.public_key().encrypt(message).unwrap();
        let decrypted = key.decrypt(&ciphertext).unwrap();

        assert_eq!(message.as_slice(), decrypted.as_slice());
    }
}
