//! Paged streaming over a block range.
//!
//! Forward streams follow `next_block` page by page. Reverse streams split the
//! range into windows of `reverse_window` blocks starting at the top, page each
//! window forward and hand it out with its rows reversed, so consumers see the
//! newest transactions first. Empty reverse windows are skipped, and a window
//! lying above the indexer's archive height moves the walk straight down to it.

use async_trait::async_trait;

use crate::{
	models::{Query, QueryResponse, ResponseData},
	services::blockchain::{
		client::{IndexerClient, StreamConfig, TransactionStream},
		BlockChainError,
	},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
	Start,
	/// Forward: next `from_block`. Reverse: exclusive top of the next window.
	At(u64),
	Done,
}

/// Stream of [`QueryResponse`] batches for one query
pub struct HyperSyncStream<C: IndexerClient> {
	client: C,
	query: Query,
	config: StreamConfig,
	position: Position,
	closed: bool,
}

impl<C: IndexerClient> HyperSyncStream<C> {
	pub fn new(client: C, query: Query, config: StreamConfig) -> Self {
		Self {
			client,
			query,
			config,
			position: Position::Start,
			closed: false,
		}
	}

	fn page_query(&self, from_block: u64, to_block: Option<u64>) -> Query {
		Query {
			from_block,
			to_block,
			..self.query.clone()
		}
	}

	async fn next_forward(&mut self) -> Result<Option<QueryResponse>, BlockChainError> {
		let from = match self.position {
			Position::Done => return Ok(None),
			Position::Start => self.query.from_block,
			Position::At(from) => from,
		};

		if self.query.to_block.is_some_and(|end| from >= end) {
			self.position = Position::Done;
			return Ok(None);
		}

		let page = self
			.client
			.query(&self.page_query(from, self.query.to_block))
			.await?;

		let exhausted = page.next_block <= from
			|| self.query.to_block.is_some_and(|end| page.next_block >= end)
			|| page
				.archive_height
				.is_some_and(|height| page.next_block > height);

		self.position = if exhausted {
			Position::Done
		} else {
			Position::At(page.next_block)
		};

		Ok(Some(page))
	}

	/// Pages through `[low, high)` and merges the pages in block order.
	async fn fetch_window(&self, low: u64, high: u64) -> Result<QueryResponse, BlockChainError> {
		let mut data = ResponseData::default();
		let mut archive_height = None;
		let mut from = low;

		loop {
			let page = self.client.query(&self.page_query(from, Some(high))).await?;
			data.extend(page.data);
			archive_height = page.archive_height.or(archive_height);

			if page.next_block >= high
				|| page.next_block <= from
				|| page
					.archive_height
					.is_some_and(|height| page.next_block > height)
			{
				break;
			}
			from = page.next_block;
		}

		Ok(QueryResponse {
			data,
			next_block: low,
			archive_height,
		})
	}

	async fn next_reverse(&mut self) -> Result<Option<QueryResponse>, BlockChainError> {
		let bottom = self.query.from_block;

		loop {
			let top = match self.position {
				Position::Done => return Ok(None),
				Position::At(top) => top,
				Position::Start => match self.query.to_block {
					Some(end) => end,
					None => self.client.get_height().await?.saturating_add(1),
				},
			};

			if top <= bottom {
				self.position = Position::Done;
				return Ok(None);
			}

			let low = top.saturating_sub(self.config.reverse_window).max(bottom);
			let mut window = self.fetch_window(low, top).await?;

			let next_top = match window.archive_height {
				Some(height) if height.saturating_add(1) < low => height + 1,
				_ => low,
			};
			self.position = if next_top <= bottom {
				Position::Done
			} else {
				Position::At(next_top)
			};

			if window.data.is_empty() {
				continue;
			}

			window.data.reverse();
			return Ok(Some(window));
		}
	}
}

#[async_trait]
impl<C: IndexerClient> TransactionStream for HyperSyncStream<C> {
	async fn recv(&mut self) -> Result<Option<QueryResponse>, BlockChainError> {
		if self.closed {
			return Ok(None);
		}

		if self.config.reverse {
			self.next_reverse().await
		} else {
			self.next_forward().await
		}
	}

	async fn close(&mut self) -> Result<(), BlockChainError> {
		if !self.closed {
			tracing::debug!(position = ?self.position, "closing indexer stream");
		}
		self.closed = true;
		self.position = Position::Done;
		Ok(())
	}
}
