//! Legacy transactions signed with EIP-155 replay protection.
//!
//! A transaction moves through three states and cannot skip one:
//! [`UnsignedTransaction`] (built) → [`HashedTransaction`] (signing payload
//! hashed) → [`SignedTransaction`]. Every signature is bound to a chain id;
//! there is no unprotected pre-EIP-155 path.

use alloy_primitives::U256;
use alloy_rlp::{Encodable, RlpEncodable};
use tracing::{debug, trace};

use crate::address::Address;
use crate::chains::EvmChain;
use crate::erc20;
use crate::error::EthError;
use crate::hash::{hash_to_hex, keccak256, Hash};
use crate::keys::PrivateKey;
use crate::rlp::{RlpBytes, RlpTo, RlpU256};
use crate::signature::{self, Signature};

/// Gas used by a plain value transfer with no calldata.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Offset folded into `v` by EIP-155: `v = recovery_id + chain_id * 2 + 35`.
const EIP155_V_OFFSET: u64 = 35;

/// A fully populated legacy transaction, ready to be hashed for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    /// Wei per unit of gas.
    pub gas_price: u128,
    pub gas_limit: u64,
    /// `None` creates a contract from `data`.
    pub to: Option<Address>,
    /// Wei.
    pub value: U256,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

/// Collects transaction fields and checks that the required ones are present.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    pub(crate) nonce: Option<u64>,
    pub(crate) gas_price: Option<u128>,
    pub(crate) gas_limit: Option<u64>,
    pub(crate) to: Option<Address>,
    pub(crate) value: U256,
    pub(crate) data: Vec<u8>,
    pub(crate) chain_id: Option<u64>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Takes the chain id from a network definition.
    pub fn chain(self, chain: &EvmChain) -> Self {
        self.chain_id(chain.chain_id)
    }

    pub fn build(self) -> Result<UnsignedTransaction, EthError> {
        let chain_id = self
            .chain_id
            .ok_or(EthError::IncompleteTransaction("chain id"))?;
        if chain_id == 0 {
            return Err(EthError::MissingChainId);
        }
        let nonce = self.nonce.ok_or(EthError::IncompleteTransaction("nonce"))?;
        let gas_limit = self
            .gas_limit
            .ok_or(EthError::IncompleteTransaction("gas limit"))?;
        let gas_price = self
            .gas_price
            .ok_or(EthError::IncompleteTransaction("gas price"))?;
        if self.to.is_none() && self.data.is_empty() {
            return Err(EthError::IncompleteTransaction(
                "recipient (or init code for contract creation)",
            ));
        }

        Ok(UnsignedTransaction {
            nonce,
            gas_price,
            gas_limit,
            to: self.to,
            value: self.value,
            data: self.data,
            chain_id,
        })
    }
}

impl UnsignedTransaction {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::new()
    }

    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
    pub fn signing_payload(&self) -> Result<Vec<u8>, EthError> {
        if self.chain_id == 0 {
            return Err(EthError::MissingChainId);
        }
        let fields = SigningFields {
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: RlpTo(self.to.map(|a| *a.as_bytes())),
            value: self.value.into(),
            data: RlpBytes(self.data.clone()),
            chain_id: self.chain_id,
            empty_r: 0,
            empty_s: 0,
        };
        let mut buf = Vec::with_capacity(fields.length());
        fields.encode(&mut buf);
        Ok(buf)
    }

    /// Hashes the signing payload, moving the transaction to the hashed state.
    pub fn hash(self) -> Result<HashedTransaction, EthError> {
        let signing_hash = keccak256(self.signing_payload()?);
        Ok(HashedTransaction {
            tx: self,
            signing_hash,
        })
    }

    /// The address a contract-creation transaction from `sender` deploys to.
    pub fn created_contract_address(&self, sender: &Address) -> Option<Address> {
        self.is_contract_creation()
            .then(|| sender.create(self.nonce))
    }
}

/// A transaction whose signing payload hash has been computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedTransaction {
    tx: UnsignedTransaction,
    signing_hash: Hash,
}

impl HashedTransaction {
    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.tx
    }

    pub fn signing_hash(&self) -> &Hash {
        &self.signing_hash
    }

    /// Signs the payload hash and folds the chain id into `v`.
    pub fn sign(self, key: &PrivateKey) -> Result<SignedTransaction, EthError> {
        let sig = signature::sign(&self.signing_hash, key).map_err(|e| match e {
            EthError::SigningFailed(_) => e,
            other => EthError::SigningFailed(other.to_string()),
        })?;

        let v = eip155_v(sig.recovery_id, self.tx.chain_id)?;
        let signed = SignedTransaction {
            tx: self.tx,
            v,
            r: sig.r,
            s: sig.s,
        };

        debug!(
            chain_id = signed.tx.chain_id,
            nonce = signed.tx.nonce,
            v,
            tx_hash = %hash_to_hex(&signed.hash()),
            "signed transaction"
        );
        Ok(signed)
    }
}

/// A transaction with its EIP-155 signature attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: UnsignedTransaction,
    v: u64,
    r: [u8; 32],
    s: [u8; 32],
}

impl SignedTransaction {
    /// Reassembles a signed transaction from fields received elsewhere.
    ///
    /// Nothing is checked here; [`SignedTransaction::sender`] fails if `v`
    /// does not belong to `tx.chain_id`.
    pub fn from_parts(tx: UnsignedTransaction, v: u64, r: [u8; 32], s: [u8; 32]) -> Self {
        Self { tx, v, r, s }
    }

    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.tx
    }

    pub fn v(&self) -> u64 {
        self.v
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`, the bytes
    /// a node accepts for broadcast.
    pub fn raw_transaction(&self) -> Vec<u8> {
        let fields = SignedFields {
            nonce: self.tx.nonce,
            gas_price: self.tx.gas_price,
            gas_limit: self.tx.gas_limit,
            to: RlpTo(self.tx.to.map(|a| *a.as_bytes())),
            value: self.tx.value.into(),
            data: RlpBytes(self.tx.data.clone()),
            v: self.v,
            r: RlpU256(self.r),
            s: RlpU256(self.s),
        };
        let mut buf = Vec::with_capacity(fields.length());
        fields.encode(&mut buf);
        buf
    }

    /// Transaction hash: `keccak256` of the signed encoding, not of the
    /// signing payload.
    pub fn hash(&self) -> Hash {
        keccak256(self.raw_transaction())
    }

    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash())
    }

    /// Inverts the EIP-155 formula to get the raw recovery id.
    pub fn recovery_id(&self) -> Result<u8, EthError> {
        let base = self
            .tx
            .chain_id
            .checked_mul(2)
            .and_then(|c| c.checked_add(EIP155_V_OFFSET))
            .ok_or_else(|| EthError::InvalidSignature("chain id too large for v".into()))?;
        match self.v.checked_sub(base) {
            Some(id @ (0 | 1)) => Ok(id as u8),
            _ => Err(EthError::InvalidSignature(format!(
                "v {} does not encode chain id {}",
                self.v, self.tx.chain_id
            ))),
        }
    }

    /// The signature over the signing payload, with the raw recovery id.
    pub fn signature(&self) -> Result<Signature, EthError> {
        Ok(Signature {
            r: self.r,
            s: self.s,
            recovery_id: self.recovery_id()?,
        })
    }

    /// Recovers the address that signed this transaction.
    pub fn sender(&self) -> Result<Address, EthError> {
        let sig = self.signature()?;
        let signing_hash = keccak256(self.tx.signing_payload()?);
        let sender = signature::recover_address(&signing_hash, &sig)?;
        trace!(sender = %sender, tx_hash = %self.hash_hex(), "recovered transaction sender");
        Ok(sender)
    }
}

#[derive(RlpEncodable)]
struct SigningFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpTo,
    value: RlpU256,
    data: RlpBytes,
    chain_id: u64,
    empty_r: u8,
    empty_s: u8,
}

#[derive(RlpEncodable)]
struct SignedFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpTo,
    value: RlpU256,
    data: RlpBytes,
    v: u64,
    r: RlpU256,
    s: RlpU256,
}

fn eip155_v(recovery_id: u8, chain_id: u64) -> Result<u64, EthError> {
    if chain_id == 0 {
        return Err(EthError::MissingChainId);
    }
    chain_id
        .checked_mul(2)
        .and_then(|c| c.checked_add(EIP155_V_OFFSET + u64::from(recovery_id)))
        .ok_or_else(|| EthError::ValueTooLarge(format!("chain id {chain_id} overflows v")))
}

/// Signs `tx` in one step: hash the payload, sign, apply EIP-155.
pub fn sign_transaction(
    tx: &UnsignedTransaction,
    key: &PrivateKey,
) -> Result<SignedTransaction, EthError> {
    tx.clone().hash()?.sign(key)
}

/// Recovers the signer of `tx`.
pub fn sender_address(tx: &SignedTransaction) -> Result<Address, EthError> {
    tx.sender()
}

/// Builds a plain value transfer with the standard 21 000 gas limit.
pub fn build_transfer(
    chain_id: u64,
    nonce: u64,
    to: Address,
    value_wei: U256,
    gas_price: u128,
) -> Result<UnsignedTransaction, EthError> {
    TransactionBuilder::new()
        .chain_id(chain_id)
        .nonce(nonce)
        .to(to)
        .value(value_wei)
        .gas_price(gas_price)
        .gas_limit(TRANSFER_GAS_LIMIT)
        .build()
}

/// Builds an ERC-20 `transfer` call.
///
/// The transaction goes to the token contract with zero value; the recipient
/// and amount live in the calldata.
pub fn build_erc20_transfer(
    chain_id: u64,
    nonce: u64,
    token_contract: Address,
    to: &Address,
    amount: U256,
    gas_price: u128,
    gas_limit: u64,
) -> Result<UnsignedTransaction, EthError> {
    TransactionBuilder::new()
        .chain_id(chain_id)
        .nonce(nonce)
        .to(token_contract)
        .data(erc20::encode_transfer(to, amount))
        .gas_price(gas_price)
        .gas_limit(gas_limit)
        .build()
}

/// Builds a contract-creation transaction carrying `init_code`.
pub fn build_contract_creation(
    chain_id: u64,
    nonce: u64,
    init_code: Vec<u8>,
    gas_price: u128,
    gas_limit: u64,
) -> Result<UnsignedTransaction, EthError> {
    TransactionBuilder::new()
        .chain_id(chain_id)
        .nonce(nonce)
        .data(init_code)
        .gas_price(gas_price)
        .gas_limit(gas_limit)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains;
    use crate::keys::import_private_key;

    const TUTORIAL_KEY: &str = "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19";

    fn eip155_example() -> UnsignedTransaction {
        UnsignedTransaction {
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: Some("0x3535353535353535353535353535353535353535".parse().unwrap()),
            value: U256::from(1_000_000_000_000_000_000u64),
            data: Vec::new(),
            chain_id: 1,
        }
    }

    fn eip155_key() -> PrivateKey {
        import_private_key(&"46".repeat(32)).unwrap()
    }

    fn dead() -> Address {
        "0x000000000000000000000000000000000000dEaD".parse().unwrap()
    }

    #[test]
    fn eip155_signing_payload_vector() {
        let payload = eip155_example().signing_payload().unwrap();
        assert_eq!(
            hex::encode(payload),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
    }

    #[test]
    fn eip155_signing_hash_vector() {
        let hashed = eip155_example().hash().unwrap();
        assert_eq!(
            hash_to_hex(hashed.signing_hash()),
            "0xdaf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn eip155_signed_vector() {
        let signed = sign_transaction(&eip155_example(), &eip155_key()).unwrap();

        assert_eq!(signed.v(), 37);
        assert_eq!(
            hex::encode(signed.r()),
            "28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276"
        );
        assert_eq!(
            hex::encode(signed.s()),
            "67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
        assert_eq!(
            hex::encode(signed.raw_transaction()),
            concat!(
                "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a7640000",
                "8025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8",
                "997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83",
            )
        );
    }

    #[test]
    fn eip155_sender_recovers() {
        let signed = sign_transaction(&eip155_example(), &eip155_key()).unwrap();
        assert_eq!(
            format!("{:#x}", sender_address(&signed).unwrap()),
            "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        );
        assert_eq!(signed.recovery_id().unwrap(), 0);
    }

    #[test]
    fn tx_hash_differs_from_signing_hash() {
        let hashed = eip155_example().hash().unwrap();
        let signing_hash = *hashed.signing_hash();
        let signed = hashed.sign(&eip155_key()).unwrap();
        assert_ne!(signed.hash(), signing_hash);
        assert_eq!(signed.hash(), keccak256(signed.raw_transaction()));
        assert_eq!(signed.hash_hex().len(), 66);
    }

    #[test]
    fn different_chain_ids_give_different_signatures() {
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        let mainnet = build_transfer(1, 0, dead(), U256::from(1u64), 30_000_000_000).unwrap();
        let rinkeby = UnsignedTransaction {
            chain_id: 4,
            ..mainnet.clone()
        };

        let a = sign_transaction(&mainnet, &key).unwrap();
        let b = sign_transaction(&rinkeby, &key).unwrap();

        assert_ne!((a.r(), a.s()), (b.r(), b.s()));
        assert_ne!(a.raw_transaction(), b.raw_transaction());
        assert_eq!(a.sender().unwrap(), key.address());
        assert_eq!(b.sender().unwrap(), key.address());
    }

    #[test]
    fn v_encodes_chain_id() {
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        for chain_id in [1u64, 4, 137, 11_155_111] {
            let tx = build_transfer(chain_id, 3, dead(), U256::ZERO, 1).unwrap();
            let signed = sign_transaction(&tx, &key).unwrap();
            let id = signed.recovery_id().unwrap();
            assert_eq!(signed.v(), u64::from(id) + chain_id * 2 + 35);
        }
    }

    #[test]
    fn replaying_on_another_chain_breaks_sender() {
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        let tx = build_transfer(1, 0, dead(), U256::from(5u64), 1).unwrap();
        let signed = sign_transaction(&tx, &key).unwrap();

        // Same v, r, s presented as a chain-4 transaction.
        let replayed = SignedTransaction::from_parts(
            UnsignedTransaction { chain_id: 4, ..tx },
            signed.v(),
            *signed.r(),
            *signed.s(),
        );
        assert!(matches!(
            replayed.sender(),
            Err(EthError::InvalidSignature(_))
        ));
    }

    #[test]
    fn tampered_field_changes_sender() {
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        let tx = build_transfer(1, 0, dead(), U256::from(5u64), 1).unwrap();
        let signed = sign_transaction(&tx, &key).unwrap();

        let tampered = SignedTransaction::from_parts(
            UnsignedTransaction {
                value: U256::from(5_000u64),
                ..tx
            },
            signed.v(),
            *signed.r(),
            *signed.s(),
        );
        if let Ok(sender) = tampered.sender() {
            assert_ne!(sender, key.address());
        }
    }

    #[test]
    fn builder_reports_missing_fields() {
        let base = TransactionBuilder::new()
            .to(dead())
            .nonce(0)
            .gas_limit(21_000)
            .gas_price(1)
            .chain_id(1);
        assert!(base.clone().build().is_ok());

        let missing_nonce = TransactionBuilder { nonce: None, ..base.clone() };
        assert!(matches!(
            missing_nonce.build(),
            Err(EthError::IncompleteTransaction("nonce"))
        ));

        let missing_gas_limit = TransactionBuilder { gas_limit: None, ..base.clone() };
        assert!(matches!(
            missing_gas_limit.build(),
            Err(EthError::IncompleteTransaction("gas limit"))
        ));

        let missing_gas_price = TransactionBuilder { gas_price: None, ..base.clone() };
        assert!(matches!(
            missing_gas_price.build(),
            Err(EthError::IncompleteTransaction("gas price"))
        ));

        let missing_chain = TransactionBuilder { chain_id: None, ..base };
        assert!(matches!(
            missing_chain.build(),
            Err(EthError::IncompleteTransaction("chain id"))
        ));
    }

    #[test]
    fn zero_chain_id_is_rejected() {
        assert!(matches!(
            build_transfer(0, 0, dead(), U256::ZERO, 1),
            Err(EthError::MissingChainId)
        ));

        let mut tx = build_transfer(1, 0, dead(), U256::ZERO, 1).unwrap();
        tx.chain_id = 0;
        assert!(matches!(tx.clone().hash(), Err(EthError::MissingChainId)));
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        assert!(matches!(
            sign_transaction(&tx, &key),
            Err(EthError::MissingChainId)
        ));
    }

    #[test]
    fn missing_recipient_requires_init_code() {
        let result = TransactionBuilder::new()
            .nonce(0)
            .gas_limit(100_000)
            .gas_price(1)
            .chain_id(1)
            .build();
        assert!(matches!(result, Err(EthError::IncompleteTransaction(_))));
    }

    #[test]
    fn contract_creation_encodes_empty_to() {
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        let tx = build_contract_creation(4, 7, vec![0x60, 0x80, 0x60, 0x40], 1, 300_000).unwrap();
        assert!(tx.is_contract_creation());

        let payload = tx.signing_payload().unwrap();
        // list header, nonce 0x07, gas price 0x01, gas limit 0x83 0493e0, then empty `to`.
        assert_eq!(&payload[1..8], &[0x07, 0x01, 0x83, 0x04, 0x93, 0xe0, 0x80]);

        let signed = sign_transaction(&tx, &key).unwrap();
        assert_eq!(signed.sender().unwrap(), key.address());
        assert_eq!(
            tx.created_contract_address(&key.address()),
            Some(key.address().create(7))
        );
    }

    #[test]
    fn value_transfer_has_no_created_contract() {
        let tx = build_transfer(1, 0, dead(), U256::ZERO, 1).unwrap();
        assert_eq!(tx.created_contract_address(&dead()), None);
    }

    #[test]
    fn erc20_transfer_goes_to_token_contract() {
        let token: Address = "0x28b149020d2152179873ec60bed6bf7cd705775d".parse().unwrap();
        let recipient: Address = "0x4592d8f8d7b001e72cb26a73e4fa1806a51ac79d".parse().unwrap();
        let amount: U256 = "1000000000000000000000".parse().unwrap();

        let tx = build_erc20_transfer(4, 5, token, &recipient, amount, 1, 65_000).unwrap();
        assert_eq!(tx.to, Some(token));
        assert_eq!(tx.value, U256::ZERO);
        assert_eq!(tx.data, erc20::encode_transfer(&recipient, amount));
    }

    #[test]
    fn builder_chain_uses_definition() {
        let tx = UnsignedTransaction::builder()
            .chain(&chains::SEPOLIA)
            .nonce(1)
            .to(dead())
            .gas_limit(TRANSFER_GAS_LIMIT)
            .gas_price(1)
            .build()
            .unwrap();
        assert_eq!(tx.chain_id, 11_155_111);
    }

    #[test]
    fn signing_is_deterministic() {
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        let tx = build_transfer(1, 0, dead(), U256::from(1u64), 1).unwrap();
        assert_eq!(
            sign_transaction(&tx, &key).unwrap(),
            sign_transaction(&tx, &key).unwrap()
        );
    }

    #[test]
    fn huge_chain_id_overflows_v() {
        let key = import_private_key(TUTORIAL_KEY).unwrap();
        let tx = build_transfer(u64::MAX, 0, dead(), U256::ZERO, 1).unwrap();
        assert!(matches!(
            sign_transaction(&tx, &key),
            Err(EthError::ValueTooLarge(_))
        ));
    }
}
