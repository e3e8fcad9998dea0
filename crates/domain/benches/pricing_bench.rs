use common::Customizations;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Channel, DraftItem, OrderService, find_drink, unit_price};
use order_store::InMemoryOrderStore;

fn bench_unit_price(c: &mut Criterion) {
    let latte = find_drink("latte").unwrap();
    let customizations = Customizations {
        oat_milk: true,
        caramel_syrup: true,
        vanilla_syrup: true,
        ..Default::default()
    };

    c.bench_function("pricing/unit_price_customized", |b| {
        b.iter(|| unit_price(latte, Channel::Preorder, &customizations));
    });
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/create_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryOrderStore::new();
                let service = OrderService::new(store);
                service
                    .create_order(
                        None,
                        vec![
                            DraftItem::customized(
                                "latte",
                                2,
                                Customizations {
                                    oat_milk: true,
                                    ..Default::default()
                                },
                            ),
                            DraftItem::plain("espresso", 1),
                        ],
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_preorder_lifecycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/preorder_submit_collect", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryOrderStore::new();
                let service = OrderService::new(store);
                let preorder = service
                    .submit_preorder(
                        "Bench".to_string(),
                        "bench@example.com".to_string(),
                        "10:30".to_string(),
                        vec![DraftItem::plain("matcha_hot", 1)],
                    )
                    .await
                    .unwrap();
                service.collect_preorder(preorder.id).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_unit_price,
    bench_create_order,
    bench_preorder_lifecycle
);
criterion_main!(benches);
