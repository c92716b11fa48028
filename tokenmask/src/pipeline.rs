//! Redact, complete, restore.
//!
//! [`Pseudonymizer`] pairs an [`EntityDetector`] with one
//! [`PlaceholderAllocator`], so every text or value it redacts draws from the
//! same counters. [`RequestProcessor`] puts a [`CompletionService`] behind it:
//! prompts are redacted before they leave, responses are restored when they
//! come back.
//!
//! Records logged here carry counts and tokens only.

use std::{
    fmt,
    iter::{self, FusedIterator},
};

use serde::{Deserialize, Serialize};
use slog::{debug, info, o, trace, warn, Discard, Logger};

use crate::{
    allocator::PlaceholderAllocator,
    category::{Category, DEFAULT_CATEGORIES},
    completion::{CompletionService, FragmentStream},
    decoder::restore,
    detector::EntityDetector,
    encoder::{self, Redacted},
    error::{Error, Result},
    mapping::Mapping,
    redaction::{RedactionMapper, SensitiveType},
    stream::StreamingDecoder,
    Pseudonymize,
};

/// Runtime settings for a [`Pseudonymizer`].
///
/// Deserializes from JSON such as `{"categories": ["US_SSN", "PERSON"]}`;
/// missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Categories the detector is asked to find.
    pub categories: Vec<Category>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().copied().map(Category::from).collect(),
        }
    }
}

impl ProcessorConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the requested categories.
    #[must_use]
    pub fn with_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// Detector plus allocator: redacts text and derived values.
///
/// Counters are never reset, so tokens stay unique for the lifetime of the
/// pseudonymizer. Share one across threads behind a `Mutex`.
pub struct Pseudonymizer<D> {
    detector: D,
    allocator: PlaceholderAllocator,
    categories: Vec<Category>,
    logger: Logger,
}

impl<D> Pseudonymizer<D>
where
    D: EntityDetector,
{
    /// Creates a pseudonymizer that looks for the default categories.
    pub fn new(detector: D) -> Self {
        Self::with_config(detector, ProcessorConfig::default())
    }

    pub fn with_config(detector: D, config: ProcessorConfig) -> Self {
        Self {
            detector,
            allocator: PlaceholderAllocator::new(),
            categories: config.categories,
            logger: Logger::root(Discard, o!()),
        }
    }

    /// Sends records to `logger` instead of discarding them.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn allocator(&self) -> &PlaceholderAllocator {
        &self.allocator
    }

    /// Detects entities in `text` and replaces each with a fresh token.
    ///
    /// A detector failure is reported as [`Error::Detector`] before any
    /// counter moves. Empty text is returned unchanged without consulting
    /// the detector.
    pub fn redact(&mut self, text: &str) -> Result<Redacted> {
        redact_text(
            &self.detector,
            &self.categories,
            &mut self.allocator,
            &self.logger,
            text,
        )
    }

    /// Redacts every `#[sensitive]` field of `value`, in declaration order.
    ///
    /// All fields share this pseudonymizer's allocator, and their mappings are
    /// merged into the one returned. On error, counters consumed by fields
    /// already redacted stay consumed.
    pub fn redact_value<T>(&mut self, value: T) -> Result<(T, Mapping)>
    where
        T: SensitiveType,
    {
        let mut session = SessionMapper {
            detector: &self.detector,
            categories: &self.categories,
            allocator: &mut self.allocator,
            logger: &self.logger,
            mapping: Mapping::new(),
        };
        let value = value.redact_with(&mut session)?;
        let mapping = session.mapping;
        debug!(self.logger, "redacted value"; "tokens" => &mapping);
        Ok((value, mapping))
    }
}

impl<D> fmt::Debug for Pseudonymizer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pseudonymizer")
            .field("categories", &self.categories)
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}

fn redact_text<D>(
    detector: &D,
    categories: &[Category],
    allocator: &mut PlaceholderAllocator,
    logger: &Logger,
    text: &str,
) -> Result<Redacted>
where
    D: EntityDetector,
{
    if text.is_empty() {
        return Ok(Redacted::default());
    }
    let spans = detector.detect(text, categories).map_err(|err| {
        warn!(logger, "entity detection failed"; "error" => %err);
        Error::Detector(err)
    })?;
    let redacted = encoder::redact(text, &spans, allocator)?;
    debug!(logger, "redacted text";
        "spans" => spans.len(),
        "tokens" => &redacted.mapping,
    );
    Ok(redacted)
}

/// Mapper for one `redact_value` call.
struct SessionMapper<'a, D> {
    detector: &'a D,
    categories: &'a [Category],
    allocator: &'a mut PlaceholderAllocator,
    logger: &'a Logger,
    mapping: Mapping,
}

impl<D> RedactionMapper for SessionMapper<'_, D>
where
    D: EntityDetector,
{
    fn map_text(&mut self, text: String) -> Result<String> {
        let redacted = redact_text(
            self.detector,
            self.categories,
            self.allocator,
            self.logger,
            &text,
        )?;
        self.mapping.merge(redacted.mapping)?;
        Ok(redacted.text)
    }

    fn map_entity(&mut self, category: &str, value: String) -> Result<String> {
        if value.is_empty() {
            return Ok(value);
        }
        let token = self.allocator.allocate(category);
        self.mapping.insert(token.clone(), value)?;
        trace!(self.logger, "classified value"; "token" => &token);
        Ok(token)
    }
}

/// A system and user prompt pair.
///
/// Both fields are scanned when the request is redacted, system first.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Pseudonymize)]
pub struct ChatRequest {
    #[sensitive]
    pub system: String,
    #[sensitive]
    pub user: String,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Every stage of one processed request.
#[derive(Clone, PartialEq, Eq)]
pub struct ProcessedRequest {
    /// The system prompt as sent to the service.
    pub redacted_system: String,
    /// The user prompt as sent to the service.
    pub redacted_user: String,
    /// Tokens from both prompts.
    pub mapping: Mapping,
    /// The response as the service returned it, tokens included.
    pub raw_response: String,
    /// The response with original values restored.
    pub response: String,
}

impl fmt::Debug for ProcessedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessedRequest")
            .field("redacted_system", &self.redacted_system)
            .field("redacted_user", &self.redacted_user)
            .field("mapping", &TokenList(&self.mapping))
            .field("raw_response", &self.raw_response)
            .field("response", &"[REDACTED]")
            .finish()
    }
}

/// Prints only the tokens of a mapping, whatever the build.
struct TokenList<'a>(&'a Mapping);

impl fmt::Debug for TokenList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.tokens()).finish()
    }
}

/// Runs prompts through a [`Pseudonymizer`] and a [`CompletionService`].
#[derive(Debug)]
pub struct RequestProcessor<D, C> {
    pseudonymizer: Pseudonymizer<D>,
    completion: C,
}

impl<D, C> RequestProcessor<D, C>
where
    D: EntityDetector,
    C: CompletionService,
{
    pub fn new(detector: D, completion: C) -> Self {
        Self::with_config(detector, completion, ProcessorConfig::default())
    }

    pub fn with_config(detector: D, completion: C, config: ProcessorConfig) -> Self {
        Self {
            pseudonymizer: Pseudonymizer::with_config(detector, config),
            completion,
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.pseudonymizer = self.pseudonymizer.with_logger(logger);
        self
    }

    pub fn pseudonymizer(&self) -> &Pseudonymizer<D> {
        &self.pseudonymizer
    }

    /// Redacts both prompts, sends them, and restores the response.
    ///
    /// Nothing is sent if redaction fails. A service failure is reported as
    /// [`Error::Completion`].
    pub fn process_request(&mut self, system: &str, user: &str) -> Result<ProcessedRequest> {
        let (request, mapping) = self
            .pseudonymizer
            .redact_value(ChatRequest::new(system, user))?;
        let logger = &self.pseudonymizer.logger;
        info!(logger, "sending redacted request"; "tokens" => &mapping);

        let raw_response = self
            .completion
            .complete(&request.system, &request.user)
            .map_err(|err| {
                warn!(logger, "text generation failed"; "error" => %err);
                Error::Completion(err)
            })?;
        let response = restore(&raw_response, &mapping)?;
        debug!(logger, "restored response"; "bytes" => response.len());

        Ok(ProcessedRequest {
            redacted_system: request.system,
            redacted_user: request.user,
            mapping,
            raw_response,
            response,
        })
    }

    /// Redacts both prompts and starts a streamed response.
    ///
    /// The returned stream exposes the redacted request and mapping before
    /// the first fragment is pulled. If the service cannot start the stream,
    /// the stream still carries that metadata and its only item is an
    /// [`Error::Completion`].
    pub fn process_request_stream(&mut self, system: &str, user: &str) -> Result<ResponseStream<'_>> {
        let (request, mapping) = self
            .pseudonymizer
            .redact_value(ChatRequest::new(system, user))?;
        let decoder = StreamingDecoder::new(&mapping)?;
        let logger = self.pseudonymizer.logger.new(o!("stream" => true));
        info!(logger, "starting redacted stream";
            "tokens" => &mapping,
            "threshold" => decoder.threshold(),
        );

        let fragments: FragmentStream<'_> = match self
            .completion
            .complete_stream(&request.system, &request.user)
        {
            Ok(fragments) => fragments,
            Err(err) => Box::new(iter::once(Err(err))),
        };

        Ok(ResponseStream {
            request,
            mapping,
            fragments: Some(fragments),
            decoder: Some(decoder),
            logger,
        })
    }
}

/// Restored fragments of a streamed response.
///
/// Yields only non-empty text. After the service's last fragment the
/// decoder's buffered tail is yielded, then the stream ends. A service error
/// is yielded once and also ends the stream.
pub struct ResponseStream<'a> {
    request: ChatRequest,
    mapping: Mapping,
    fragments: Option<FragmentStream<'a>>,
    decoder: Option<StreamingDecoder>,
    logger: Logger,
}

impl ResponseStream<'_> {
    /// The request as it was sent to the service.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Tokens used in this request.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }
}

impl Iterator for ResponseStream<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let fragments = self.fragments.as_mut()?;
            match fragments.next() {
                Some(Ok(fragment)) => {
                    let decoder = self.decoder.as_mut()?;
                    let released = decoder.process_fragment(&fragment);
                    trace!(self.logger, "fragment";
                        "received" => fragment.len(),
                        "released" => released.len(),
                        "buffered" => decoder.buffered_len(),
                    );
                    if !released.is_empty() {
                        return Some(Ok(released));
                    }
                }
                Some(Err(err)) => {
                    warn!(self.logger, "stream failed"; "error" => %err);
                    self.fragments = None;
                    self.decoder = None;
                    return Some(Err(Error::Completion(err)));
                }
                None => {
                    self.fragments = None;
                    let tail = self
                        .decoder
                        .take()
                        .map(StreamingDecoder::finalize)
                        .unwrap_or_default();
                    debug!(self.logger, "stream finished"; "tail" => tail.len());
                    return (!tail.is_empty()).then_some(Ok(tail));
                }
            }
        }
    }
}

impl FusedIterator for ResponseStream<'_> {}

impl fmt::Debug for ResponseStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseStream")
            .field("request", &self.request)
            .field("mapping", &TokenList(&self.mapping))
            .field("finished", &self.fragments.is_none())
            .finish_non_exhaustive()
    }
}
