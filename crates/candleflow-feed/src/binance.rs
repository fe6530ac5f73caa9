//! Binance USDⓈ-M futures trade stream.
//!
//! Subscribes to one `<symbol>@trade` stream per instrument through the
//! combined-stream endpoint, so a single connection carries every
//! instrument.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use candleflow_core::{FeedError, Side, Trade, TradeFeed};

/// Envelope wrapping every combined-stream frame.
///
/// Control frames such as subscription acks carry no `data` member and
/// decode with `data: None`.
#[derive(Debug, Deserialize)]
struct StreamEnvelope {
    data: Option<TradeEvent>,
}

/// Payload of a `<symbol>@trade` event.
///
/// Prices and quantities arrive as decimal strings and are parsed here.
#[derive(Debug, Deserialize)]
struct TradeEvent {
    #[serde(rename = "e")]
    event_type: String,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "T")]
    trade_time: i64,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    quantity: String,
    #[serde(rename = "m")]
    buyer_is_maker: bool,
}

impl TradeEvent {
    fn into_trade(self) -> Result<Trade, FeedError> {
        let price = self
            .price
            .parse::<f64>()
            .map_err(|e| FeedError::Decode(format!("bad price '{}': {}", self.price, e)))?;
        let quantity = self
            .quantity
            .parse::<f64>()
            .map_err(|e| FeedError::Decode(format!("bad quantity '{}': {}", self.quantity, e)))?;
        let timestamp = DateTime::from_timestamp_millis(self.trade_time)
            .ok_or_else(|| FeedError::Decode(format!("bad trade time {}", self.trade_time)))?;
        // The maker flag marks the passive side. When the buyer was the
        // maker, the aggressor sold.
        let side = if self.buyer_is_maker {
            Side::Sell
        } else {
            Side::Buy
        };
        Ok(Trade::new(
            self.symbol.to_lowercase(),
            timestamp,
            price,
            quantity,
            side,
        ))
    }
}

/// Decode one text frame into a trade, if it carries one.
///
/// Returns `Ok(None)` for control frames and non-trade events, and an
/// error for frames that should have been trades but do not parse.
fn decode_frame(text: &str) -> Result<Option<Trade>, FeedError> {
    let envelope: StreamEnvelope =
        serde_json::from_str(text).map_err(|e| FeedError::Decode(e.to_string()))?;
    let Some(event) = envelope.data else {
        return Ok(None);
    };
    if event.event_type != "trade" {
        return Ok(None);
    }
    event.into_trade().map(Some)
}

/// Live trade feed backed by the Binance futures combined stream.
pub struct BinanceTradeFeed {
    symbols: Vec<String>,
    ws_url: String,
    reconnect_delay: Duration,
}

impl BinanceTradeFeed {
    pub const DEFAULT_WS_URL: &'static str = "wss://fstream.binance.com";
    pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

    /// Create a feed subscribing to the trade stream of each symbol.
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            ws_url: Self::DEFAULT_WS_URL.to_string(),
            reconnect_delay: Self::DEFAULT_RECONNECT_DELAY,
        }
    }

    /// Override the websocket endpoint.
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    /// Override the fixed delay between reconnect attempts.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Combined-stream URL carrying one `@trade` stream per symbol.
    fn stream_url(&self) -> String {
        let streams = self
            .symbols
            .iter()
            .map(|s| format!("{}@trade", s.to_lowercase()))
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/stream?streams={}", self.ws_url, streams)
    }

    /// Run one websocket session until a transport error, a server
    /// close or a stop request.
    async fn stream_session(
        &self,
        url: &str,
        sink: &mpsc::Sender<Trade>,
        stop: &CancellationToken,
    ) -> Result<(), FeedError> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;
        info!(url, "trade stream connected");
        let (mut write, mut read) = ws.split();

        loop {
            tokio::select! {
                _ = stop.cancelled() => {
                    let _ = write.send(Message::Close(None)).await;
                    info!("trade stream closed on stop request");
                    return Ok(());
                }
                frame = read.next() => {
                    let message = match frame {
                        Some(Ok(message)) => message,
                        Some(Err(e)) => return Err(FeedError::Connection(e.to_string())),
                        None => return Err(FeedError::StreamClosed),
                    };
                    match message {
                        Message::Text(text) => match decode_frame(&text) {
                            Ok(Some(trade)) => {
                                if !trade.is_valid() {
                                    warn!(
                                        symbol = %trade.symbol,
                                        price = trade.price,
                                        quantity = trade.quantity,
                                        "dropping invalid trade record"
                                    );
                                    continue;
                                }
                                if sink.send(trade).await.is_err() {
                                    return Err(FeedError::SinkClosed);
                                }
                            }
                            Ok(None) => {}
                            Err(e) => debug!(error = %e, "ignoring undecodable frame"),
                        },
                        Message::Ping(payload) => {
                            write
                                .send(Message::Pong(payload))
                                .await
                                .map_err(|e| FeedError::Connection(e.to_string()))?;
                        }
                        Message::Close(_) => return Err(FeedError::StreamClosed),
                        _ => {}
                    }
                }
            }
        }
    }
}

#[async_trait]
impl TradeFeed for BinanceTradeFeed {
    async fn run(
        &self,
        sink: mpsc::Sender<Trade>,
        stop: CancellationToken,
    ) -> Result<(), FeedError> {
        let url = self.stream_url();
        info!(symbols = ?self.symbols, "starting trade feed");

        while !stop.is_cancelled() {
            match self.stream_session(&url, &sink, &stop).await {
                Ok(()) => break,
                Err(FeedError::SinkClosed) => {
                    warn!("trade sink closed, stopping feed");
                    return Err(FeedError::SinkClosed);
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        delay_secs = self.reconnect_delay.as_secs(),
                        "trade stream failed, reconnecting"
                    );
                    tokio::select! {
                        _ = stop.cancelled() => break,
                        _ = tokio::time::sleep(self.reconnect_delay) => {}
                    }
                }
            }
        }

        info!("trade feed stopped");
        Ok(())
    }
}
