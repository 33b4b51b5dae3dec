mod common;

use std::sync::Arc;

use aari_backend::{
    common::{
        error::{AppError, ErrorKind},
        pagination::Pagination,
    },
    models::aari::{AariStatus, ClientPricePayload, ClientPriceSelector, SubmitAariForm, WorkerPricePayload},
    services::AariService,
};
use common::{form, png, MemoryStorage};
use rust_decimal::Decimal;

fn service() -> (AariService, Arc<aari_backend::db::memory::MemoryAariStore>, Arc<MemoryStorage>) {
    let store = Arc::new(aari_backend::db::memory::MemoryAariStore::new());
    let storage = Arc::new(MemoryStorage::new());
    (AariService::new(store.clone(), storage.clone()), store, storage)
}

fn worker_price(value: i64) -> WorkerPricePayload {
    WorkerPricePayload {
        worker_price: Some(Decimal::new(value, 0)),
    }
}

fn client_price(value: i64) -> ClientPricePayload {
    ClientPricePayload {
        client_price: Some(Decimal::new(value, 0)),
    }
}

#[tokio::test]
async fn designs_follow_file_order_whatever_the_upload_order() {
    let (service, store, storage) = service();
    let files = vec![png(1), png(2), png(3), png(4), png(5)];

    let order_id = service.submit_order(form("AARI-1"), files.clone()).await.unwrap();
    assert_eq!(order_id, "AARI-1");

    let stored = store.get("AARI-1").await.unwrap();
    assert_eq!(stored.designs.len(), files.len());
    for (url, file) in stored.designs.iter().zip(&files) {
        assert!(url.contains("/Aari/"), "{url}");
        assert_eq!(storage.object_for_url(url).await.as_deref(), Some(file.bytes.as_slice()));
    }
    assert_eq!(stored.status, AariStatus::Pending);
    assert_eq!(stored.completed_date, None);
}

#[tokio::test]
async fn submission_without_files_is_rejected() {
    let (service, store, storage) = service();

    let err = service.submit_order(form("AARI-2"), vec![]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.to_string(), "At least one design file is required");
    assert_eq!(store.len().await, 0);
    assert!(storage.keys().await.is_empty());
}

#[tokio::test]
async fn delivery_not_after_submission_is_rejected() {
    let (service, store, _) = service();

    for delivery in ["2025-03-01", "2025-02-20", "2025-02-28T23:59:59Z"] {
        let bad = SubmitAariForm {
            delivery_date: Some(delivery.into()),
            ..form("AARI-3")
        };
        let err = service.submit_order(bad, vec![png(1)]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{delivery}");
    }
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn second_completion_keeps_the_first_completed_date() {
    let (service, _, _) = service();
    service.submit_order(form("AARI-4"), vec![png(1)]).await.unwrap();

    let first = service.mark_completed("AARI-4", worker_price(800)).await.unwrap();
    let first_date = first.order.completed_date.expect("completed date set");
    assert_eq!(first.order.status, AariStatus::Completed);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = service.mark_completed("AARI-4", worker_price(900)).await.unwrap();

    assert_eq!(second.order.completed_date, Some(first_date));
    assert_eq!(second.order.worker_price, Some(Decimal::new(900, 0)));
}

#[tokio::test]
async fn completion_requires_a_positive_worker_price() {
    let (service, store, _) = service();
    service.submit_order(form("AARI-5"), vec![png(1)]).await.unwrap();

    for payload in [worker_price(0), worker_price(-10), WorkerPricePayload { worker_price: None }] {
        let err = service.mark_completed("AARI-5", payload).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
    assert_eq!(store.get("AARI-5").await.unwrap().status, AariStatus::Pending);

    let err = service.mark_completed("missing", worker_price(100)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn non_positive_client_price_leaves_the_order_untouched() {
    let (service, store, _) = service();
    service.submit_order(form("AARI-6"), vec![png(1)]).await.unwrap();
    let before = store.get("AARI-6").await.unwrap();

    for value in [0, -5] {
        let err = service
            .set_client_price(ClientPriceSelector::OrderId("AARI-6".into()), client_price(value))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    let after = store.get("AARI-6").await.unwrap();
    assert_eq!(after.client_price, None);
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn client_price_by_phone_hits_the_latest_order_only() {
    let (service, store, _) = service();
    service.submit_order(form("AARI-7"), vec![png(1)]).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    service.submit_order(form("AARI-8"), vec![png(1)]).await.unwrap();
    service.mark_completed("AARI-8", worker_price(700)).await.unwrap();

    let updated = service
        .set_client_price(
            ClientPriceSelector::PhoneNumber("+91-9876543210".into()),
            client_price(3000),
        )
        .await
        .unwrap();

    assert_eq!(updated.order.order_id, "AARI-8");
    assert_eq!(updated.order.client_price, Some(Decimal::new(3000, 0)));
    // Preço não mexe em status nem em data de conclusão.
    assert_eq!(updated.order.status, AariStatus::Completed);
    assert_eq!(store.get("AARI-7").await.unwrap().client_price, None);

    let err = service
        .set_client_price(
            ClientPriceSelector::PhoneNumber("+91-9000000000".into()),
            client_price(3000),
        )
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No order found for this phone number");
}

#[tokio::test]
async fn concurrent_duplicate_order_ids_store_exactly_one() {
    let (service, store, _) = service();

    let (a, b) = tokio::join!(
        service.submit_order(form("AARI-9"), vec![png(1)]),
        service.submit_order(form("AARI-9"), vec![png(2)]),
    );

    let results = [a, b];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ErrorKind::Conflict))
        .count();
    assert_eq!((ok, conflicts), (1, 1));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn design_urls_round_trip() {
    let (service, store, _) = service();
    service
        .submit_order(form("AARI-10"), vec![png(3), png(1)])
        .await
        .unwrap();

    let urls = service.get_design_urls("AARI-10").await.unwrap();
    assert_eq!(urls, store.get("AARI-10").await.unwrap().designs);

    let err = service.get_design_urls("AARI-404").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let (service, _, _) = service();
    service.submit_order(form("AARI-11"), vec![png(1)]).await.unwrap();

    service.delete_order("AARI-11").await.unwrap();
    let err = service.delete_order("AARI-11").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn pending_pages_are_slices_sorted_by_delivery_date() {
    let (service, _, _) = service();
    // Inseridos na ordem inversa de entrega.
    for day in (1..=25).rev() {
        let f = SubmitAariForm {
            submission_date: Some("2025-01-01".into()),
            delivery_date: Some(format!("2025-02-{day:02}")),
            ..form(&format!("AARI-P{day:02}"))
        };
        service.submit_order(f, vec![png(1)]).await.unwrap();
    }

    let page_two = service.list_pending(Pagination::new(2, 10)).await.unwrap();
    let ids: Vec<_> = page_two.iter().map(|o| o.order_id.as_str()).collect();
    let expected: Vec<String> = (11..=20).map(|d| format!("AARI-P{d:02}")).collect();
    assert_eq!(ids, expected);

    let last = service.list_pending(Pagination::new(3, 10)).await.unwrap();
    assert_eq!(last.len(), 5);

    let past_end = service.list_pending(Pagination::new(4, 10)).await.unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn completed_listing_is_most_recent_first() {
    let (service, _, _) = service();
    for id in ["AARI-C1", "AARI-C2", "AARI-C3"] {
        service.submit_order(form(id), vec![png(1), png(2)]).await.unwrap();
    }
    for id in ["AARI-C2", "AARI-C1"] {
        service.mark_completed(id, worker_price(500)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let completed = service.list_completed(Pagination::default()).await.unwrap();
    let ids: Vec<_> = completed.iter().map(|o| o.order_id.as_str()).collect();
    assert_eq!(ids, ["AARI-C1", "AARI-C2"]);
    assert!(completed[0].design.as_deref().is_some_and(|url| url.contains("/Aari/")));

    let pending = service.list_pending(Pagination::default()).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].order_id, "AARI-C3");
}
