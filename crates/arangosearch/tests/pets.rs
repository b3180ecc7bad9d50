use arangosearch::{
    count, cursor_from_rows, find, search, AqlDatabase, AqlQuery, Cursor, Filter, Limit, Terms,
};
use async_trait::async_trait;
use serde_json::{json, Value as Json};
use std::collections::VecDeque;
use std::sync::{Mutex, Once};

// ----- helpers ---------------------------------------------------------------

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Replays canned result sets in order and records every query it receives.
#[derive(Default)]
struct Replay {
    responses: Mutex<VecDeque<Vec<Json>>>,
    seen: Mutex<Vec<AqlQuery>>,
}

impl Replay {
    fn new(responses: Vec<Vec<Json>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.query.clone())
            .collect()
    }
}

#[derive(Debug, PartialEq)]
struct Exhausted;

#[async_trait]
impl AqlDatabase for Replay {
    type Error = Exhausted;

    async fn query(&self, query: &AqlQuery) -> Result<Cursor<Exhausted>, Exhausted> {
        self.seen.lock().unwrap().push(query.clone());
        let rows = self.responses.lock().unwrap().pop_front().ok_or(Exhausted)?;
        Ok(cursor_from_rows(rows))
    }
}

fn pets() -> Vec<Json> {
    vec![
        json!({ "_key": "greedo", "name": "Greedo", "age": 5, "species": "cat" }),
        json!({ "_key": "haribo", "name": "Haribo", "age": 1.5, "species": "dog" }),
        json!({ "_key": "iguana", "name": "Iguana", "age": 3, "species": "dog" }),
        json!({ "_key": "jerkins", "name": "Jerkins", "age": 15, "species": "cat" }),
        json!({ "_key": "kahlua", "name": "Kahlua", "age": 0.5, "species": "hamster" }),
        json!({ "_key": "lemonade", "name": "Lemonade", "age": 9, "species": "dog" }),
    ]
}

// ----- tests -----------------------------------------------------------------

#[tokio::test]
async fn count_older_pets() {
    init_tracing();
    let db = Replay::new(vec![vec![json!(3)]]);

    let n = count(&db, "pets")
        .run_json(&json!({ "age": { "gt": 5 } }), None)
        .await
        .unwrap();

    assert_eq!(n, 3);
    assert_eq!(
        db.queries(),
        vec!["FOR i IN @@value0 FILTER i.age > 5 COLLECT WITH COUNT INTO n RETURN n"]
    );
}

#[tokio::test]
async fn find_by_name_then_miss() {
    init_tracing();
    let db = Replay::new(vec![vec![pets()[2].clone()], vec![]]);
    let finder = find(&db, "pets");

    let hit = finder
        .run_json(&json!({ "name": { "eq": "Iguana" } }), None, None)
        .await
        .unwrap();
    assert_eq!(hit.map(|d| d["_key"].clone()), Some(json!("iguana")));

    let miss = finder
        .run(
            Some(&Terms::new().filter("name", Filter::new().eq("Nonexistent"))),
            None,
            None,
        )
        .await
        .unwrap();
    assert!(miss.is_none());

    assert_eq!(db.queries().len(), 2);
}

#[tokio::test]
async fn limited_search_reports_the_true_total() {
    init_tracing();
    let db = Replay::new(vec![vec![json!(6)], pets()[..3].to_vec()]);

    let (total, docs, query) = search(&db, "pets")
        .run(None, Some(Limit::new(3)), None, None)
        .await
        .unwrap()
        .into_parts();

    assert_eq!(total, 6);
    assert_eq!(docs.len(), 3);
    assert_eq!(query.query, "FOR i IN @@value0 SORT i._rev ASC LIMIT 3 RETURN i");
    assert_eq!(
        db.queries(),
        vec![
            "FOR i IN @@value0 COLLECT WITH COUNT INTO n RETURN n",
            "FOR i IN @@value0 SORT i._rev ASC LIMIT 3 RETURN i",
        ]
    );
}

#[tokio::test]
async fn concurrent_calls_share_nothing() {
    init_tracing();
    let db = Replay::new(vec![vec![json!(6)], vec![json!(6)]]);
    let counter = count(&db, "pets");

    let (a, b) = futures::join!(counter.run(None, None), counter.run(None, None));
    assert_eq!(a.unwrap(), 6);
    assert_eq!(b.unwrap(), 6);
}
