//! Upstream player feed.
//!
//! The feed is an XML document whose fields are only identified by position. All knowledge of
//! that layout lives in [`parse_feed`] and [`player_from_node`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use roxmltree::{Document, Node};

use crate::errors::AppError;
use crate::models::{FeedSnapshot, PlayerRecord, Position};

/// Source of feed snapshots.
#[async_trait]
pub trait PlayerFeed: Send + Sync {
    /// Fetch and parse the current snapshot.
    async fn fetch(&self) -> Result<FeedSnapshot, AppError>;
}

/// HTTP client for the live feed.
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PlayerFeed for FeedClient {
    async fn fetch(&self) -> Result<FeedSnapshot, AppError> {
        tracing::debug!("Fetching player feed from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            tracing::warn!("Player feed returned status {}", response.status());
            return Err(AppError::Upstream(format!(
                "Feed returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let snapshot = parse_feed(&body)?;
        tracing::info!(
            "Fetched gameweek {} feed with {} players",
            snapshot.gameweek,
            snapshot.players.len()
        );
        Ok(snapshot)
    }
}

// Section layout of the document root.
const HEADER_SECTION: usize = 0;
const PLAYERS_SECTION: usize = 1;
// First child of the header.
const HEADER_GAMEWEEK: usize = 0;

// Children of a player element.
const PLAYER_ID: usize = 0;
const PLAYER_NAME: usize = 3;
const PLAYER_POSITION: usize = 4;
const PLAYER_PRICE: usize = 5;
/// Only present once the week's results are published.
const PLAYER_RESULTS: usize = 7;

// Children of a player's results section.
const RESULTS_SCORE: usize = 8;
const RESULTS_NEXT_PRICE: usize = 9;

/// Parse a feed document into a snapshot.
pub fn parse_feed(xml: &str) -> Result<FeedSnapshot, AppError> {
    let document = Document::parse(xml)?;
    let root = document.root_element();

    let header = nth_element(root, HEADER_SECTION, "header section")?;
    let gameweek = element_text(header, HEADER_GAMEWEEK, "gameweek")?;
    gameweek.parse::<i64>().map_err(|_| {
        AppError::Upstream(format!("Feed gameweek {:?} is not a number", gameweek))
    })?;

    let mut snapshot = FeedSnapshot::new(gameweek);
    let players = nth_element(root, PLAYERS_SECTION, "players section")?;
    for node in players.children().filter(Node::is_element) {
        snapshot.insert(player_from_node(node)?);
    }

    Ok(snapshot)
}

/// Convert one player element.
///
/// | child | field                       |
/// |-------|-----------------------------|
/// | 0     | player id                   |
/// | 3     | display name                |
/// | 4     | position (GK/DF/MF/FW)      |
/// | 5     | current price               |
/// | 7     | results section, optional   |
///
/// Inside the results section, child 8 is the week's score and child 9 the next week's price.
/// Without a results section both stay `None`.
fn player_from_node(node: Node<'_, '_>) -> Result<PlayerRecord, AppError> {
    let id = element_text(node, PLAYER_ID, "player id")?;
    let name = element_text(node, PLAYER_NAME, "player name")?;

    let position_text = element_text(node, PLAYER_POSITION, "player position")?;
    let position = Position::from_str(&position_text).ok_or_else(|| {
        AppError::Upstream(format!(
            "Player {} has unknown position {:?}",
            id, position_text
        ))
    })?;

    let current_price = parse_price(&element_text(node, PLAYER_PRICE, "player price")?, &id)?;

    let results = node.children().filter(Node::is_element).nth(PLAYER_RESULTS);
    let (current_score, next_price) = match results {
        Some(results) => {
            let score = parse_int(&element_text(results, RESULTS_SCORE, "week score")?, &id)?;
            let next = parse_price(&element_text(results, RESULTS_NEXT_PRICE, "next price")?, &id)?;
            (Some(score), Some(next))
        }
        None => (None, None),
    };

    Ok(PlayerRecord {
        id,
        name,
        position,
        current_price,
        next_price,
        current_score,
    })
}

fn nth_element<'a, 'input>(
    node: Node<'a, 'input>,
    index: usize,
    what: &str,
) -> Result<Node<'a, 'input>, AppError> {
    node.children()
        .filter(Node::is_element)
        .nth(index)
        .ok_or_else(|| AppError::Upstream(format!("Feed is missing the {}", what)))
}

fn element_text(node: Node<'_, '_>, index: usize, what: &str) -> Result<String, AppError> {
    let child = nth_element(node, index, what)?;
    Ok(child.text().unwrap_or_default().trim().to_string())
}

fn parse_int(text: &str, player_id: &str) -> Result<i64, AppError> {
    text.parse().map_err(|_| {
        AppError::Upstream(format!(
            "Player {} has non-numeric value {:?}",
            player_id, text
        ))
    })
}

/// Prices debit the bank, so a negative one would mint money.
fn parse_price(text: &str, player_id: &str) -> Result<i64, AppError> {
    let price = parse_int(text, player_id)?;
    if price < 0 {
        return Err(AppError::Upstream(format!(
            "Player {} has negative price {}",
            player_id, price
        )));
    }
    Ok(price)
}
