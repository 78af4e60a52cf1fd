use dkimsign::{
    crypto::SigningKey,
    signer::{SignRequest, Signer},
    SignatureTags,
};
use rsa::{pkcs1::DecodeRsaPrivateKey, pkcs8::DecodePrivateKey, RsaPrivateKey};
use std::{env, process};
use tokio::{
    fs,
    io::{self, AsyncReadExt},
};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt::try_init();

    let mut args = env::args();

    let (key_file, domain, selector) = match (
        args.next().as_deref(),
        args.next(),
        args.next(),
        args.next(),
        args.next(),
    ) {
        (_, Some(key_file), Some(domain), Some(selector), None) => (key_file, domain, selector),
        (program, ..) => {
            eprintln!("usage: {} <key_file> <domain> <selector>", program.unwrap_or("dkimsign"));
            process::exit(1);
        }
    };

    let key_file = fs::read_to_string(key_file).await.unwrap();

    // accept both "BEGIN RSA PRIVATE KEY" and "BEGIN PRIVATE KEY" files
    let private_key = RsaPrivateKey::from_pkcs1_pem(&key_file)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(&key_file))
        .unwrap();

    let tags = SignatureTags::new(&domain, &selector).unwrap();

    let request = SignRequest::new(tags, SigningKey::from(private_key));

    let mut msg = String::new();
    let n = io::stdin().read_to_string(&mut msg).await.unwrap();
    assert!(n > 0, "empty message on stdin");

    let msg = msg.replace('\n', "\r\n");

    let signer = match Signer::prepare_signing(request, &msg) {
        Ok(signer) => signer,
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    };

    match signer.sign() {
        Ok(result) => {
            let message = result.message.replace("\r\n", "\n");
            print!("{message}");
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }
    }
}
