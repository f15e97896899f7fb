//! End-to-end recommendation tests: collaborative scores, factorization
//! blending, and the category fallback top-up.

mod common;

use std::sync::Arc;

use tavola_api::entities::Category;
use tavola_api::repositories::InMemoryStore;
use tavola_api::services::recommendation::evaluator;
use uuid::Uuid;

use common::{at, completed_order, dish, review, state_over};

#[tokio::test]
async fn similar_tastes_surface_the_peers_favorite() {
    let store = Arc::new(InMemoryStore::new());
    let margherita = dish("Margherita", Category::Pizza, &[]);
    let diavola = dish("Diavola", Category::Pizza, &[]);
    let quattro = dish("Quattro Formaggi", Category::Pizza, &[]);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Alice and Bob agree on two dishes; Bob also loves the Diavola.
    store.insert_review(review(alice, margherita.id, 5));
    store.insert_review(review(alice, quattro.id, 1));
    store.insert_review(review(bob, margherita.id, 5));
    store.insert_review(review(bob, quattro.id, 1));
    store.insert_review(review(bob, diavola.id, 5));

    let diavola_id = diavola.id;
    store.insert_dish(margherita);
    store.insert_dish(diavola);
    store.insert_dish(quattro);

    let state = state_over(store);
    let recs = state.recommendations.recommend(alice, 3).await.unwrap();

    assert_eq!(recs[0].id, diavola_id);
    assert_eq!(recs[0].average_rating, 5.0);
    assert_eq!(recs[0].review_count, 1);
    // dishes Alice already rated never come back
    assert!(recs.iter().all(|d| d.name != "Margherita"));
    assert!(recs.iter().all(|d| d.name != "Quattro Formaggi"));
}

#[tokio::test]
async fn fallback_tops_up_from_the_users_favorite_category() {
    let store = Arc::new(InMemoryStore::new());
    let margherita = dish("Margherita", Category::Pizza, &[]);
    let diavola = dish("Diavola", Category::Pizza, &[]);
    let capricciosa = dish("Capricciosa", Category::Pizza, &[]);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    store.insert_review(review(alice, margherita.id, 5));
    store.insert_review(review(bob, margherita.id, 5));
    store.insert_review(review(bob, diavola.id, 5));

    let (diavola_id, capricciosa_id) = (diavola.id, capricciosa.id);
    store.insert_dish(margherita);
    store.insert_dish(diavola);
    store.insert_dish(capricciosa);

    let state = state_over(store);
    let recs = state.recommendations.recommend(alice, 3).await.unwrap();

    let ids: Vec<Uuid> = recs.iter().map(|d| d.id).collect();
    assert!(ids.contains(&diavola_id));
    // never reviewed by anyone; only the category fallback can add it
    assert!(ids.contains(&capricciosa_id));
}

#[tokio::test]
async fn no_signals_means_no_recommendations() {
    let store = Arc::new(InMemoryStore::new());
    store.insert_dish(dish("Margherita", Category::Pizza, &[]));
    let state = state_over(store);

    let recs = state
        .recommendations
        .recommend(Uuid::new_v4(), 5)
        .await
        .unwrap();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn order_history_alone_feeds_the_fallback() {
    let store = Arc::new(InMemoryStore::new());
    let margherita = dish("Margherita", Category::Pizza, &[]);
    let diavola = dish("Diavola", Category::Pizza, &[]);
    let carol = Uuid::new_v4();

    store.insert_order(completed_order(carol, margherita.id, 2, at(2026, 8, 1, 19)));

    let diavola_id = diavola.id;
    store.insert_dish(margherita);
    store.insert_dish(diavola);

    let state = state_over(store);
    let recs = state.recommendations.recommend(carol, 5).await.unwrap();

    // the ordered dish is treated as rated; the sibling pizza fills in
    let ids: Vec<Uuid> = recs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![diavola_id]);
    assert_eq!(recs[0].average_rating, 0.0);
    assert_eq!(recs[0].review_count, 0);
}

#[tokio::test]
async fn offline_evaluation_reports_bounded_metrics() {
    let store = Arc::new(InMemoryStore::new());
    let margherita = dish("Margherita", Category::Pizza, &[]);
    let diavola = dish("Diavola", Category::Pizza, &[]);
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    store.insert_review(review(alice, margherita.id, 5));
    store.insert_review(review(alice, diavola.id, 4));
    store.insert_review(review(bob, margherita.id, 5));
    store.insert_dish(margherita);
    store.insert_dish(diavola);

    let state = state_over(store.clone());
    let reviews = tavola_api::repositories::ReviewRepository::all_reviews(store.as_ref())
        .await
        .unwrap();
    let report = evaluator::evaluate(&state.recommendations, &reviews)
        .await
        .unwrap()
        .unwrap();

    // only Alice has two reviews, so exactly one user is evaluated
    assert_eq!(report.users, 1);
    assert!((0.0..=1.0).contains(&report.precision));
    assert!((0.0..=1.0).contains(&report.recall));
    assert!(report.ndcg >= 0.0);
}

#[tokio::test]
async fn retrain_is_safe_to_call_repeatedly() {
    let store = Arc::new(InMemoryStore::new());
    let margherita = dish("Margherita", Category::Pizza, &[]);
    let alice = Uuid::new_v4();
    store.insert_review(review(alice, margherita.id, 5));
    store.insert_dish(margherita);

    let state = state_over(store);
    state.recommendations.retrain().await.unwrap();
    state.recommendations.retrain().await.unwrap();
    let recs = state.recommendations.recommend(alice, 5).await.unwrap();
    assert!(recs.iter().all(|d| d.name != "Margherita"));
}
