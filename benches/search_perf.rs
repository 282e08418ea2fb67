use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use proposal_search::corpus::{RawCip, RawCorpus, RawCps, normalize};
use proposal_search::search::highlight::content_snippet;
use proposal_search::search::{SearchFilters, SortOption, search_items};

fn synthetic_corpus(n: u32) -> RawCorpus {
    let body = "## Motivation\nWallets and ledgers need a shared standard for metadata.\n".repeat(40);
    RawCorpus {
        cips: (1..=n)
            .map(|i| RawCip {
                number: Some(i),
                title: Some(format!("Proposal {i} on wallet metadata")),
                status: Some(if i % 3 == 0 { "Draft" } else { "Active" }.into()),
                category: Some(if i % 2 == 0 { "Wallets" } else { "Ledger" }.into()),
                created: Some(format!("20{:02}-01-01", 15 + i % 10)),
                slug: Some(format!("CIP-{i:04}")),
                content: Some(body.clone()),
                ..Default::default()
            })
            .collect(),
        cps: (1..=n / 4)
            .map(|i| RawCps {
                number: Some(i),
                title: Some(format!("Problem {i}")),
                status: Some("Open".into()),
                created: Some("2023-01-01".into()),
                slug: Some(format!("CPS-{i:04}")),
                ..Default::default()
            })
            .collect(),
    }
}

fn bench_search(c: &mut Criterion) {
    let raw = synthetic_corpus(400);
    let items = normalize(&raw).expect("synthetic corpus is valid");
    let filters = SearchFilters::default();

    c.bench_function("normalize_500", |b| b.iter(|| normalize(black_box(&raw))));

    c.bench_function("search_empty_query", |b| {
        b.iter(|| search_items(black_box(&items), "", &filters, SortOption::NumberAsc, None))
    });

    c.bench_function("search_wallet_title_sort", |b| {
        b.iter(|| search_items(black_box(&items), "wallet", &filters, SortOption::TitleAsc, Some(50)))
    });

    c.bench_function("snippet", |b| {
        b.iter(|| content_snippet(black_box(&items[0].content), "ledgers", 100))
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
