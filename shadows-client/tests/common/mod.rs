//! Shared test helpers for client tests.

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{Map, Value, json};
use shadows_client::{
    ApiRequest, ApiResponse, ClientConfig, ClientResult, Credentials, DatabaseInteractor, Method,
    Transport,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const ENDPOINT: &str = "http://fake.test/api";
pub const TOKEN: &str = "test-token";

/// Relation fields holding many records, rendered as list envelopes.
const MANY: &[&str] = &["plates", "things", "experiments", "samples"];
/// Relation fields holding one record, rendered as single envelopes.
const ONE: &[&str] = &["current_plate", "current_experiment", "plate"];

#[derive(Default)]
struct State {
    next_id: i64,
    records: BTreeMap<String, Vec<(i64, Map<String, Value>)>>,
    log: Vec<(Method, String, Option<Value>)>,
}

/// In-memory stand-in for a Strapi backend.
///
/// Stores attributes per collection, merges PUT bodies at the top level,
/// renders relation fields as envelopes, and derives a plate's `wells` from
/// the wells pointing at it.
#[derive(Clone, Default)]
pub struct FakeStrapi {
    state: Arc<Mutex<State>>,
}

impl FakeStrapi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials() -> Credentials {
        Credentials::new(ENDPOINT, TOKEN)
    }

    pub fn interactor(&self) -> DatabaseInteractor {
        DatabaseInteractor::with_transport(
            Self::credentials(),
            &ClientConfig::default(),
            Arc::new(self.clone()),
        )
    }

    /// Inserts a record directly, bypassing the client.
    pub fn seed(&self, collection: &str, attributes: Value) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        let attributes = attributes.as_object().cloned().unwrap_or_default();
        state
            .records
            .entry(collection.to_string())
            .or_default()
            .push((id, attributes));
        id
    }

    pub fn count(&self, collection: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.records.get(collection).map_or(0, Vec::len)
    }

    /// Stored (un-rendered) attributes of a record.
    pub fn stored(&self, collection: &str, id: i64) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .records
            .get(collection)?
            .iter()
            .find(|(rid, _)| *rid == id)
            .map(|(_, attrs)| Value::Object(attrs.clone()))
    }

    /// Names of records in `collection`, in insertion order.
    pub fn names(&self, collection: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .records
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|(_, attrs)| attrs.get("name")?.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every request seen so far as `(method, path)`.
    pub fn requests(&self) -> Vec<(Method, String)> {
        let state = self.state.lock().unwrap();
        state
            .log
            .iter()
            .map(|(method, url, _)| (*method, path_of(url)))
            .collect()
    }

    pub fn request_bodies(&self) -> Vec<Option<Value>> {
        let state = self.state.lock().unwrap();
        state.log.iter().map(|(_, _, body)| body.clone()).collect()
    }

    fn render(state: &State, collection: &str, id: i64, attrs: &Map<String, Value>) -> Value {
        let mut rendered = Map::new();
        for (key, value) in attrs {
            let ids: Vec<Value> = match value {
                Value::Array(items) => items.clone(),
                Value::Null => Vec::new(),
                other => vec![other.clone()],
            };
            let envelope = if MANY.contains(&key.as_str()) {
                let refs: Vec<Value> = ids
                    .into_iter()
                    .map(|id| json!({"id": id, "attributes": {}}))
                    .collect();
                json!({"data": refs})
            } else if ONE.contains(&key.as_str()) {
                match ids.last() {
                    Some(id) => json!({"data": {"id": id, "attributes": {}}}),
                    None => json!({"data": null}),
                }
            } else {
                value.clone()
            };
            rendered.insert(key.clone(), envelope);
        }

        if collection == "plates" {
            let wells: Vec<Value> = state
                .records
                .get("wells")
                .map(|wells| {
                    wells
                        .iter()
                        .filter(|(_, w)| w.get("plate") == Some(&json!(id)))
                        .map(|(wid, _)| json!({"id": wid, "attributes": {}}))
                        .collect()
                })
                .unwrap_or_default();
            rendered.insert("wells".to_string(), json!({"data": wells}));
        }

        json!({"id": id, "attributes": rendered})
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let url = Url::parse(&request.url).unwrap();
        let segments: Vec<String> = url
            .path()
            .trim_start_matches("/api/")
            .split('/')
            .map(str::to_string)
            .collect();
        let filter = url
            .query_pairs()
            .find(|(k, _)| k == "filters[name][$eq]")
            .map(|(_, v)| v.into_owned());

        let mut state = self.state.lock().unwrap();
        let collection = segments[0].clone();

        match (request.method, segments.get(1)) {
            (Method::Get, None) => {
                let records = state.records.get(&collection).cloned().unwrap_or_default();
                let data: Vec<Value> = records
                    .iter()
                    .filter(|(_, attrs)| match &filter {
                        Some(name) => attrs.get("name") == Some(&json!(name)),
                        None => true,
                    })
                    .map(|(id, attrs)| Self::render(&state, &collection, *id, attrs))
                    .collect();
                ok(json!({"data": data, "meta": {}}))
            }
            (Method::Post, None) => {
                let attrs = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("data"))
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                state.next_id += 1;
                let id = state.next_id;
                state
                    .records
                    .entry(collection.clone())
                    .or_default()
                    .push((id, attrs.clone()));
                let data = Self::render(&state, &collection, id, &attrs);
                ok(json!({"data": data, "meta": {}}))
            }
            (method, Some(raw_id)) => {
                let id: i64 = raw_id.parse().unwrap();
                let position = state
                    .records
                    .get(&collection)
                    .and_then(|records| records.iter().position(|(rid, _)| *rid == id));
                let Some(position) = position else {
                    return ApiResponse {
                        status: 404,
                        body: json!({"data": null, "error": {"status": 404, "name": "NotFoundError"}}),
                    };
                };
                if method == Method::Put {
                    let patch = request
                        .body
                        .as_ref()
                        .and_then(|b| b.get("data"))
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default();
                    let records = state.records.get_mut(&collection).unwrap();
                    for (key, value) in patch {
                        records[position].1.insert(key, value);
                    }
                }
                let attrs = state.records[&collection][position].1.clone();
                let data = Self::render(&state, &collection, id, &attrs);
                ok(json!({"data": data, "meta": {}}))
            }
            (_, None) => ApiResponse {
                status: 405,
                body: json!({"data": null}),
            },
        }
    }
}

fn ok(body: Value) -> ApiResponse {
    ApiResponse { status: 200, body }
}

fn path_of(url: &str) -> String {
    Url::parse(url).unwrap().path().to_string()
}

#[async_trait]
impl Transport for FakeStrapi {
    fn name(&self) -> &'static str {
        "fake-strapi"
    }

    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        assert_eq!(request.token, TOKEN);
        let response = self.handle(&request);
        self.state
            .lock()
            .unwrap()
            .log
            .push((request.method, request.url, request.body));
        Ok(response)
    }
}
