//! 性能基准测试
//! 派生树构建、钱包文件序列化与校验

use bitcoin::Network;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use paperwallet::domain::{Wallet, WalletVerifier};

const WALLET_SEED: [u8; 16] = [
    0x08, 0xc9, 0x33, 0x9a, 0xe3, 0x1e, 0x2e, 0xfd, 0xb1, 0xc7, 0x27, 0xfd, 0x0a, 0x01, 0xf3, 0x57,
];

fn bench_wallet_derivation(c: &mut Criterion) {
    c.bench_function("wallet_from_entropy", |b| {
        b.iter(|| Wallet::from_entropy(black_box(&WALLET_SEED), "", Network::Bitcoin))
    });
}

fn bench_address_derivation(c: &mut Criterion) {
    let wallet = Wallet::from_entropy(&WALLET_SEED, "", Network::Bitcoin).unwrap();
    let account = wallet.account(0).unwrap().clone();

    c.bench_function("derive_chain_addresses", |b| {
        b.iter(|| {
            for chain in account.chains() {
                black_box(chain.addresses(2).unwrap());
            }
        })
    });
}

fn bench_verification(c: &mut Criterion) {
    let verifier = WalletVerifier::new(Network::Bitcoin);

    // 明文种子，不包含 PBKDF2 开销
    let cleartext = Wallet::from_entropy(&WALLET_SEED, "", Network::Bitcoin)
        .unwrap()
        .file_content()
        .unwrap();
    c.bench_function("verify_cleartext_document", |b| {
        b.iter(|| verifier.check(black_box(&cleartext), ""))
    });

    let encrypted = Wallet::from_entropy(&WALLET_SEED, "bench pass", Network::Bitcoin)
        .unwrap()
        .file_content()
        .unwrap();
    let mut group = c.benchmark_group("encrypted");
    group.sample_size(10);
    group.bench_function("verify_encrypted_document", |b| {
        b.iter(|| verifier.check(black_box(&encrypted), "bench pass"))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_wallet_derivation,
    bench_address_derivation,
    bench_verification
);
criterion_main!(benches);
