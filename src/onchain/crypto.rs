use solana_sdk::signature::Keypair;

use bip39::Mnemonic;
use ring::hmac::{self, Key};
use sodiumoxide::crypto::sign::{ed25519, Seed};

use super::constants::{CURVE, PATH};

const HARDENED_OFFSET: u32 = 0x80000000;

/// Accepts either a BIP39 mnemonic (derived along `m/44'/501'/0'/0'`) or a
/// base58-encoded 64-byte keypair.
pub fn get_wallet(secret: &str) -> eyre::Result<Keypair> {
    if let Ok(mnemonic) = Mnemonic::parse(secret) {
        return keypair_from_mnemonic(&mnemonic);
    }

    let decoded_key = solana_sdk::bs58::decode(secret)
        .into_vec()
        .map_err(|_| eyre::eyre!("Invalid private key"))?;

    Keypair::from_bytes(&decoded_key).map_err(|e| eyre::eyre!("Invalid private key: {e}"))
}

struct Keys {
    key: Vec<u8>,
    chain_code: Vec<u8>,
}

impl Keys {
    fn from_hmac(key: &[u8], data: &[u8]) -> Self {
        let tag = hmac::sign(&Key::new(hmac::HMAC_SHA512, key), data);
        let (il, ir) = tag.as_ref().split_at(32);

        Self {
            key: il.to_vec(),
            chain_code: ir.to_vec(),
        }
    }

    fn master(seed: &[u8]) -> Self {
        Self::from_hmac(CURVE.as_bytes(), seed)
    }

    fn child(&self, index: u32) -> Self {
        let mut data = vec![0u8];
        data.extend_from_slice(&self.key);
        data.extend_from_slice(&index.to_be_bytes());

        Self::from_hmac(&self.chain_code, &data)
    }
}

fn parse_segments(path: &str) -> eyre::Result<Vec<u32>> {
    path.split('/')
        .skip(1)
        .map(|segment| {
            segment
                .trim_end_matches('\'')
                .parse::<u32>()
                .map_err(|e| eyre::eyre!("Invalid derivation segment `{segment}`: {e}"))
        })
        .collect()
}

fn derive_path(seed: &[u8], path: &str) -> eyre::Result<Keys> {
    let derived = parse_segments(path)?
        .into_iter()
        .fold(Keys::master(seed), |parent, segment| {
            parent.child(segment + HARDENED_OFFSET)
        });

    Ok(derived)
}

fn keypair_from_mnemonic(mnemonic: &Mnemonic) -> eyre::Result<Keypair> {
    sodiumoxide::init().map_err(|_| eyre::eyre!("Failed to initialize sodiumoxide"))?;

    let seed = mnemonic.to_seed("");
    let Keys { key, .. } = derive_path(&seed, PATH)?;

    let seed = Seed::from_slice(&key).ok_or_else(|| eyre::eyre!("Invalid derived seed"))?;
    let (public_key, _) = ed25519::keypair_from_seed(&seed);

    let mut secret_key = Vec::with_capacity(64);
    secret_key.extend_from_slice(&key);
    secret_key.extend_from_slice(public_key.as_ref());

    Keypair::from_bytes(&secret_key).map_err(|e| eyre::eyre!("Invalid derived keypair: {e}"))
}
