// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! RPC interface for the content projection layer.
//!
//! The runtime answers with raw [`Discussion`] records; this crate layers
//! on everything consensus does not know: body text from the content store
//! plug-in, body pruning, URL assembly and lenient metadata parsing.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;

use codec::Codec;
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use sp_api::ProvideRuntimeApi;
use sp_blockchain::HeaderBackend;
use sp_runtime::traits::Block as BlockT;

use ap_protocol::Asset;
use ap_rpc::runtime_error_into_rpc_err;
use apallet_content_rpc_runtime_api::{ChainProperties, Discussion, VoteState};

pub use apallet_content_rpc_runtime_api::ContentApi as ContentRuntimeApi;

/// Bodies above this size are pruned from API responses.
const MAX_BODY_SIZE: usize = 1024 * 128;

/// Reply bodies above this size are pruned from API responses.
const MAX_REPLY_BODY_SIZE: usize = 1024 * 16;

/// What the content-storage plug-in keeps per comment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentContent {
    pub title: String,
    pub body: String,
    pub json_metadata: String,
}

/// The plug-in responsible for comment bodies; consensus never stores them.
pub trait ContentStore: Send + Sync {
    /// The stored content of `(author, permlink)`, if any.
    fn comment_content(&self, author: &str, permlink: &str) -> Option<CommentContent>;
}

/// An empty store for nodes that do not index content.
impl ContentStore for () {
    fn comment_content(&self, _: &str, _: &str) -> Option<CommentContent> {
        None
    }
}

/// Normalized `json_metadata`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentMetadata {
    pub tags: Vec<String>,
    pub language: String,
}

/// A [`Discussion`] dressed for API consumers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound = "AccountId: Serialize + DeserializeOwned")]
pub struct DiscussionRecord<AccountId> {
    pub id: u64,
    pub author: AccountId,
    pub permlink: String,
    pub parent_author: Option<AccountId>,
    pub parent_permlink: String,
    pub category: String,
    pub url: String,

    pub title: String,
    pub body: String,
    pub json_metadata: String,
    pub metadata: CommentMetadata,

    pub created: u64,
    pub cashout_time: u64,
    pub depth: u16,
    pub children: u32,
    pub net_rshares: i64,
    pub net_votes: i32,
    pub total_votes: u32,

    pub pending_payout_value: Asset,
    pub total_pending_payout_value: Asset,
    pub author_reputation: Option<i64>,
    pub promoted: Asset,

    pub active_votes: Vec<VoteState<AccountId>>,
    pub active_votes_count: u32,
}

/// The votes on a comment plus the total count past the limit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound = "AccountId: Serialize + DeserializeOwned")]
pub struct ActiveVotes<AccountId> {
    pub votes: Vec<VoteState<AccountId>>,
    pub total_count: u32,
}

#[rpc(client, server)]
pub trait ContentApi<BlockHash, AccountId> {
    /// A comment with its derived fields, body and votes.
    #[method(name = "content_getDiscussion")]
    fn get_discussion(
        &self,
        author: AccountId,
        permlink: String,
        vote_limit: u32,
        at: Option<BlockHash>,
    ) -> RpcResult<Option<DiscussionRecord<AccountId>>>;

    /// The votes on a comment, up to `limit`, plus the total count.
    #[method(name = "content_getActiveVotes")]
    fn get_active_votes(
        &self,
        author: AccountId,
        permlink: String,
        limit: u32,
        at: Option<BlockHash>,
    ) -> RpcResult<Option<ActiveVotes<AccountId>>>;

    /// Raw stored content of a comment, straight from the plug-in.
    #[method(name = "content_getContent")]
    fn get_content(&self, author: AccountId, permlink: String)
        -> RpcResult<Option<CommentContent>>;

    /// Chain-level knobs of the content and worker subsystems.
    #[method(name = "content_getChainProperties")]
    fn get_chain_properties(&self, at: Option<BlockHash>) -> RpcResult<ChainProperties>;
}

/// A struct that implements the [`ContentApi`].
pub struct Content<C, B> {
    client: Arc<C>,
    store: Arc<dyn ContentStore>,
    _marker: std::marker::PhantomData<B>,
}

impl<C, B> Content<C, B> {
    /// Creates a new `Content` around a client and a content store.
    pub fn new(client: Arc<C>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            client,
            store,
            _marker: Default::default(),
        }
    }
}

impl<C, Block, AccountId> ContentApiServer<<Block as BlockT>::Hash, AccountId>
    for Content<C, Block>
where
    Block: BlockT,
    C: Send + Sync + 'static + ProvideRuntimeApi<Block> + HeaderBackend<Block>,
    C::Api: ContentRuntimeApi<Block, AccountId>,
    AccountId: Clone + Display + Codec + Send + Sync + 'static + Serialize + DeserializeOwned,
{
    fn get_discussion(
        &self,
        author: AccountId,
        permlink: String,
        vote_limit: u32,
        at: Option<<Block as BlockT>::Hash>,
    ) -> RpcResult<Option<DiscussionRecord<AccountId>>> {
        let api = self.client.runtime_api();
        let at = at.unwrap_or_else(|| self.client.info().best_hash);

        let discussion = api
            .discussion(at, author, permlink.into_bytes(), vote_limit)
            .map_err(runtime_error_into_rpc_err)?;

        Ok(discussion.map(|d| render_discussion(d, &*self.store)))
    }

    fn get_active_votes(
        &self,
        author: AccountId,
        permlink: String,
        limit: u32,
        at: Option<<Block as BlockT>::Hash>,
    ) -> RpcResult<Option<ActiveVotes<AccountId>>> {
        let api = self.client.runtime_api();
        let at = at.unwrap_or_else(|| self.client.info().best_hash);

        let votes = api
            .active_votes(at, author, permlink.into_bytes(), limit)
            .map_err(runtime_error_into_rpc_err)?;

        Ok(votes.map(|(votes, total_count)| ActiveVotes { votes, total_count }))
    }

    fn get_content(
        &self,
        author: AccountId,
        permlink: String,
    ) -> RpcResult<Option<CommentContent>> {
        Ok(self.store.comment_content(&author.to_string(), &permlink))
    }

    fn get_chain_properties(
        &self,
        at: Option<<Block as BlockT>::Hash>,
    ) -> RpcResult<ChainProperties> {
        let api = self.client.runtime_api();
        let at = at.unwrap_or_else(|| self.client.info().best_hash);
        api.chain_properties(at).map_err(runtime_error_into_rpc_err)
    }
}

fn render_discussion<AccountId: Display + Clone>(
    d: Discussion<AccountId>,
    store: &dyn ContentStore,
) -> DiscussionRecord<AccountId> {
    let author_repr = d.author.to_string();
    let permlink = lossy(&d.permlink);
    let content = store
        .comment_content(&author_repr, &permlink)
        .unwrap_or_default();

    let is_reply = d.parent_author.is_some();
    let body = prune_body(content.body, is_reply);
    let metadata = get_metadata(&content.json_metadata);

    let category = lossy(&d.category);
    let url = build_url(
        &category,
        &d.root_author.to_string(),
        &lossy(&d.root_permlink),
        &author_repr,
        &permlink,
        d.id == d.root_comment,
    );

    DiscussionRecord {
        id: d.id,
        author: d.author,
        permlink,
        parent_author: d.parent_author,
        parent_permlink: lossy(&d.parent_permlink),
        category,
        url,
        title: content.title,
        body,
        json_metadata: content.json_metadata,
        metadata,
        created: d.created,
        cashout_time: d.cashout_time,
        depth: d.depth,
        children: d.children,
        net_rshares: d.net_rshares,
        net_votes: d.net_votes,
        total_votes: d.total_votes,
        pending_payout_value: d.pending_payout_value,
        total_pending_payout_value: d.total_pending_payout_value,
        author_reputation: d.author_reputation,
        promoted: d.promoted,
        active_votes: d.active_votes,
        active_votes_count: d.active_votes_count,
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Replaces oversized bodies with a fixed marker, with a tighter bound for
/// replies.
pub fn prune_body(body: String, is_reply: bool) -> String {
    if body.len() > MAX_BODY_SIZE {
        return "body pruned due to size".to_string();
    }
    if is_reply && body.len() > MAX_REPLY_BODY_SIZE {
        return "comment pruned due to size".to_string();
    }
    body
}

/// `/category/@root_author/root_permlink`, with a `#@author/permlink`
/// fragment for replies.
pub fn build_url(
    category: &str,
    root_author: &str,
    root_permlink: &str,
    author: &str,
    permlink: &str,
    is_root: bool,
) -> String {
    let mut url = format!("/{}/@{}/{}", category, root_author, root_permlink);
    if !is_root {
        url.push_str(&format!("#@{}/{}", author, permlink));
    }
    url
}

#[derive(Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    language: String,
}

/// Parses `json_metadata` leniently: malformed input yields the empty
/// metadata, tags are trimmed, lowercased, deduplicated and limited to the
/// first five non-empty entries, the language is trimmed and lowercased.
pub fn get_metadata(json_metadata: &str) -> CommentMetadata {
    let raw: RawMetadata = if json_metadata.is_empty() {
        RawMetadata::default()
    } else {
        serde_json::from_str(json_metadata).unwrap_or_default()
    };

    let mut tags = BTreeSet::new();
    for tag in raw.tags {
        if tags.len() >= 5 {
            break;
        }
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        tags.insert(tag);
    }

    CommentMetadata {
        tags: tags.into_iter().collect(),
        language: raw.language.trim().to_lowercase(),
    }
}
