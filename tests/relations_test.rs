use marketplace::lifecycle::MarketplaceSystem;
use marketplace::model::{
    Art, ArtType, AssetType, Brand, BrandCategory, Collection, Feature, Output, Transaction, TransactionStatus,
};
use marketplace::repositories::ChildRepository;
use resource_framework::{FrameworkError, Repository};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

fn reference(id: i64) -> Collection {
    Collection {
        id: Some(id),
        ..Collection::default()
    }
}

async fn art(system: &MarketplaceSystem, handle: &str) -> i64 {
    let saved = system
        .art_repository()
        .insert(Art::new("Mona", handle, AssetType::Image, ArtType::Digital))
        .await
        .unwrap();
    saved.id.unwrap()
}

fn ids<T: resource_framework::ResourceEntity>(records: &[T]) -> Vec<i64> {
    records.iter().filter_map(|r| r.id()).collect()
}

#[tokio::test]
async fn test_membership_is_symmetric_from_either_side() {
    let system = MarketplaceSystem::new(8);
    let arts = system.art_repository();
    let collections = system.collection_repository();

    let first = art(&system, "mona-1").await;
    let second = art(&system, "mona-2").await;

    let mut genesis = Collection::named("Genesis");
    genesis.arts = vec![Art {
        id: Some(first),
        ..Art::default()
    }];
    let genesis = collections.insert(genesis).await.unwrap();
    let genesis_id = genesis.id.unwrap();
    assert_eq!(ids(&genesis.arts), vec![first]);

    // Written from the collection side, read from the art side
    let loaded = arts.find_by_id(first).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.collections), vec![genesis_id]);

    // Written from the art side, read from the collection side
    assert!(arts.add_collection(second, genesis_id).await.unwrap());
    let loaded = collections.find_by_id(genesis_id).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.arts), vec![first, second]);

    assert!(collections.remove_art(genesis_id, first).await.unwrap());
    let loaded = arts.find_by_id(first).await.unwrap().unwrap();
    assert!(loaded.collections.is_empty());

    // Saving an art never touches its memberships
    let mut replacement = Art::new("Mona", "mona-2b", AssetType::Image, ArtType::Digital);
    replacement.collections = vec![reference(99)];
    arts.replace(second, replacement).await.unwrap();
    let loaded = collections.find_by_id(genesis_id).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.arts), vec![second]);
}

#[tokio::test]
async fn test_full_replace_diffs_the_link_rows() {
    let system = MarketplaceSystem::new(8);
    let collections = system.collection_repository();
    let a = art(&system, "a").await;
    let b = art(&system, "b").await;
    let c = art(&system, "c").await;
    let with = |ids: &[i64]| -> Vec<Art> {
        ids.iter()
            .map(|id| Art {
                id: Some(*id),
                ..Art::default()
            })
            .collect()
    };

    let mut genesis = Collection::named("Genesis");
    genesis.arts = with(&[a, b]);
    let id = collections.insert(genesis).await.unwrap().id.unwrap();

    let mut update = Collection::named("Genesis");
    update.arts = with(&[b, c]);
    let saved = collections.replace(id, update).await.unwrap();
    assert_eq!(ids(&saved.arts), vec![b, c]);
    assert!(system.art_repository().find_by_id(a).await.unwrap().unwrap().collections.is_empty());
}

#[tokio::test]
async fn test_deleting_either_side_removes_link_rows() {
    let system = MarketplaceSystem::new(8);
    let arts = system.art_repository();
    let collections = system.collection_repository();

    let kept = art(&system, "kept").await;
    let removed = art(&system, "removed").await;
    let mut genesis = Collection::named("Genesis");
    genesis.arts = vec![
        Art {
            id: Some(kept),
            ..Art::default()
        },
        Art {
            id: Some(removed),
            ..Art::default()
        },
    ];
    let genesis_id = collections.insert(genesis).await.unwrap().id.unwrap();

    assert!(arts.delete_by_id(removed).await.unwrap());
    let loaded = collections.find_by_id(genesis_id).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.arts), vec![kept]);

    assert!(collections.delete_by_id(genesis_id).await.unwrap());
    let loaded = arts.find_by_id(kept).await.unwrap().unwrap();
    assert!(loaded.collections.is_empty());
    assert_eq!(system.arts.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_set_features_reassigns_and_releases_children() {
    let system = MarketplaceSystem::new(8);
    let collections = system.collection_repository();
    let features = system.feature_repository();

    let genesis = collections.insert(Collection::named("Genesis")).await.unwrap().id.unwrap();
    let other = collections.insert(Collection::named("Other")).await.unwrap().id.unwrap();

    let mut feature_ids = Vec::new();
    for (name, owner) in [("palette", Some(genesis)), ("mood", Some(genesis)), ("era", Some(other))] {
        let feature = Feature {
            name: Some(name.to_string()),
            collection: owner.map(reference),
            ..Feature::default()
        };
        feature_ids.push(features.insert(feature).await.unwrap().id.unwrap());
    }
    let (palette, mood, era) = (feature_ids[0], feature_ids[1], feature_ids[2]);

    let changed = collections
        .set_features(genesis, BTreeSet::from([mood, era]))
        .await
        .unwrap();
    assert_eq!(changed, 3);

    let loaded = collections.find_by_id(genesis).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.features), vec![mood, era]);
    let dropped = features.find_by_id(palette).await.unwrap().unwrap();
    assert!(dropped.collection.is_none());
    let moved = features.find_by_id(era).await.unwrap().unwrap();
    assert_eq!(moved.collection.and_then(|c| c.id), Some(genesis));

    let err = collections.set_features(404, BTreeSet::new()).await.unwrap_err();
    assert_eq!(err, FrameworkError::not_found("collection", 404));
}

#[tokio::test]
async fn test_transaction_outputs_load_in_position_order() {
    let system = MarketplaceSystem::new(8);
    let transactions = system.transaction_repository();
    let outputs: ChildRepository<Output> = system.output_repository();

    let tx = Transaction {
        reference: Some("tx-1".into()),
        amount: Some(Decimal::new(1000, 2)),
        currency: Some("EUR".into()),
        status: Some(TransactionStatus::Pending),
        ..Transaction::default()
    };
    let tx_id = transactions.insert(tx).await.unwrap().id.unwrap();

    let mut output_ids = BTreeSet::new();
    for position in [2, 0, 1] {
        let output = Output {
            address: Some(format!("0x{position}")),
            position: Some(position),
            ..Output::default()
        };
        output_ids.insert(outputs.insert(output).await.unwrap().id.unwrap());
    }
    transactions.set_outputs(tx_id, output_ids).await.unwrap();

    let loaded = transactions.find_by_id(tx_id).await.unwrap().unwrap();
    let positions: Vec<_> = loaded.outputs.iter().filter_map(|o| o.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert!(loaded.datas.is_empty());

    let output = outputs.find_by_id(loaded.outputs[0].id.unwrap()).await.unwrap().unwrap();
    assert_eq!(output.transaction.and_then(|t| t.id), Some(tx_id));
}

#[tokio::test]
async fn test_brand_categories_from_both_sides() {
    let system = MarketplaceSystem::new(8);
    let brands = system.brand_repository();
    let categories = system.brand_category_repository();

    let shoes = categories.insert(BrandCategory::named("Shoes")).await.unwrap().id.unwrap();
    let hats = categories.insert(BrandCategory::named("Hats")).await.unwrap().id.unwrap();
    let acme = brands.insert(Brand::new("Acme", "acme")).await.unwrap().id.unwrap();

    assert!(brands.add_category(acme, shoes).await.unwrap());
    assert!(categories.add_brand(hats, acme).await.unwrap());

    let loaded = brands.find_by_id(acme).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.categories), vec![shoes, hats]);
    let loaded = categories.find_by_id(shoes).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.brands), vec![acme]);

    categories.delete_by_id(hats).await.unwrap();
    let loaded = brands.find_by_id(acme).await.unwrap().unwrap();
    assert_eq!(ids(&loaded.categories), vec![shoes]);

    let err = brands.add_category(acme, hats).await.unwrap_err();
    assert!(err.is_not_found());
}
