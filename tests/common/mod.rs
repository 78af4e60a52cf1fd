use dkimsign::{
    crypto::SigningKey,
    signer::{SignRequest, Signer},
    SignerError, SigningResult,
};
use rsa::{pkcs1::DecodeRsaPrivateKey, RsaPrivateKey, RsaPublicKey};
use std::io::{self, ErrorKind};
use tokio::fs;

pub async fn read_private_key_from_file(file_name: &str) -> io::Result<RsaPrivateKey> {
    let s = fs::read_to_string(file_name).await?;
    RsaPrivateKey::from_pkcs1_pem(&s)
        .map_err(|_| io::Error::new(ErrorKind::Other, "invalid private key format"))
}

pub async fn read_signing_key_from_file(file_name: &str) -> io::Result<SigningKey> {
    read_private_key_from_file(file_name).await.map(SigningKey::from)
}

pub async fn read_public_key_from_file(file_name: &str) -> io::Result<RsaPublicKey> {
    read_private_key_from_file(file_name).await.map(|k| RsaPublicKey::from(&k))
}

pub fn sign(request: SignRequest<SigningKey>, message: &str) -> Result<SigningResult, SignerError> {
    let signer = Signer::prepare_signing(request, message)?;

    signer.sign()
}
