//! NASA Image and Video Library: search plus curated aggregates.

use std::fmt;

use axum::{extract::State, routing::get, Router};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::warn;

use nasa_explorer_lib::image_library::{collection_items, total_hits};
use nasa_explorer_lib::MediaType;
use nasa_explorer_service_shared::{
    record_fanout_subcall, settle_all, AppState, Envelope, ImageRandomParams, ImageSearch,
    ImageSearchParams, ValidQuery,
};

use super::ApiResult;

pub const POPULAR_TOPICS: [&str; 10] = [
    "mars",
    "earth",
    "moon",
    "jupiter",
    "saturn",
    "hubble",
    "international space station",
    "apollo",
    "nebula",
    "galaxy",
];

/// Only the head of [`POPULAR_TOPICS`] is fetched.
const POPULAR_FETCHED: usize = 5;
const POPULAR_ITEMS: usize = 3;

/// A curated search shown on the featured page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedCollection {
    pub name: &'static str,
    pub query: &'static str,
    pub description: &'static str,
}

impl fmt::Display for FeaturedCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub const FEATURED_COLLECTIONS: [FeaturedCollection; 5] = [
    FeaturedCollection {
        name: "Hubble Space Telescope",
        query: "hubble telescope",
        description: "Amazing images from the Hubble Space Telescope",
    },
    FeaturedCollection {
        name: "Mars Exploration",
        query: "mars rover exploration",
        description: "Mars exploration missions and discoveries",
    },
    FeaturedCollection {
        name: "Earth from Space",
        query: "earth space view",
        description: "Beautiful views of Earth from space",
    },
    FeaturedCollection {
        name: "Apollo Missions",
        query: "apollo mission moon",
        description: "Historic Apollo moon landing missions",
    },
    FeaturedCollection {
        name: "Deep Space",
        query: "deep space nebula galaxy",
        description: "Stunning deep space imagery",
    },
];

const FEATURED_ITEMS: usize = 6;

pub const RANDOM_TOPICS: [&str; 14] = [
    "space", "mars", "earth", "moon", "jupiter", "saturn", "hubble", "nebula", "galaxy",
    "astronaut", "rocket", "iss", "apollo", "shuttle",
];

/// A random pick comes from the first this-many items of a topic's page.
const RANDOM_PICK_WINDOW: usize = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/popular", get(popular))
        .route("/featured", get(featured))
        .route("/random", get(random))
}

async fn search(
    State(state): State<AppState>,
    ValidQuery(search): ValidQuery<ImageSearchParams>,
) -> ApiResult<Value> {
    let ImageSearch {
        query,
        media_type,
        page,
    } = search;
    Ok(Envelope::ok(
        state.service().image_search(&query, media_type, page).await?,
    ))
}

#[derive(Debug, Serialize)]
struct Popular {
    topics: &'static [&'static str],
    results: Map<String, Value>,
}

/// `GET /api/image-library/popular`
async fn popular(State(state): State<AppState>) -> ApiResult<Popular> {
    let service = state.service();
    let settled = settle_all(
        "image_popular",
        POPULAR_TOPICS.iter().copied().take(POPULAR_FETCHED),
        |topic| service.image_search(topic, MediaType::Image, 1),
    )
    .await;

    let mut results = Map::new();
    for (topic, outcome) in settled {
        match outcome {
            Ok(body) => {
                let items = collection_items(&body);
                if !items.is_empty() {
                    results.insert(
                        topic.to_string(),
                        json!({
                            "total_hits": total_hits(&body),
                            "items": &items[..items.len().min(POPULAR_ITEMS)],
                        }),
                    );
                }
            }
            Err(_) => {
                results.insert(
                    topic.to_string(),
                    json!({ "error": format!("Failed to fetch images for {}", topic) }),
                );
            }
        }
    }

    Ok(Envelope::ok(Popular {
        topics: &POPULAR_TOPICS,
        results,
    }))
}

/// `GET /api/image-library/featured`, keyed by collection name.
async fn featured(State(state): State<AppState>) -> ApiResult<Map<String, Value>> {
    let service = state.service();
    let settled = settle_all("image_featured", FEATURED_COLLECTIONS, |collection| {
        service.image_search(collection.query, MediaType::Image, 1)
    })
    .await;

    let mut collections = Map::new();
    for (collection, outcome) in settled {
        match outcome {
            Ok(body) => {
                let items = collection_items(&body);
                if !items.is_empty() {
                    collections.insert(
                        collection.name.to_string(),
                        json!({
                            "description": collection.description,
                            "query": collection.query,
                            "total_hits": total_hits(&body),
                            "items": &items[..items.len().min(FEATURED_ITEMS)],
                        }),
                    );
                }
            }
            Err(_) => {
                collections.insert(
                    collection.name.to_string(),
                    json!({
                        "description": collection.description,
                        "error": format!("Failed to fetch {} collection", collection.name),
                    }),
                );
            }
        }
    }
    Ok(Envelope::ok(collections))
}

#[derive(Debug, Serialize)]
struct RandomImages {
    count: usize,
    images: Vec<Value>,
}

/// `GET /api/image-library/random?count=` (default 10, at most 20)
///
/// Topics are tried one at a time in shuffled order, each at most once,
/// until `count` images are picked or the topics run out.
async fn random(
    State(state): State<AppState>,
    ValidQuery(count): ValidQuery<ImageRandomParams>,
) -> ApiResult<RandomImages> {
    let wanted = count as usize;
    let mut images = Vec::with_capacity(wanted);

    for topic in shuffled_topics() {
        if images.len() >= wanted {
            break;
        }
        match state.service().image_search(topic, MediaType::Image, 1).await {
            Ok(body) => {
                record_fanout_subcall("image_random", "ok");
                if let Some(image) = pick(collection_items(&body), topic) {
                    images.push(image);
                }
            }
            Err(error) => {
                warn!(route = "image_random", key = topic, error = %error, "fan-out sub-call failed");
                record_fanout_subcall("image_random", "error");
            }
        }
    }

    Ok(Envelope::ok(RandomImages {
        count: images.len(),
        images,
    }))
}

fn shuffled_topics() -> Vec<&'static str> {
    let mut topics = RANDOM_TOPICS.to_vec();
    topics.shuffle(&mut rand::rng());
    topics
}

/// One item from the head of a result page, tagged with its topic.
fn pick(items: &[Value], topic: &str) -> Option<Value> {
    if items.is_empty() {
        return None;
    }
    let index = rand::rng().random_range(0..items.len().min(RANDOM_PICK_WINDOW));
    let mut item = items.get(index)?.clone();
    if let Some(obj) = item.as_object_mut() {
        obj.insert("search_topic".to_string(), Value::String(topic.to_string()));
    }
    Some(item)
}
