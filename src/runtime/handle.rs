use std::sync::Arc;

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::{AbortHandle, JoinSet},
    time::Instant,
};
use tracing::{Instrument, debug, info_span, warn};

use crate::{
    core::{
        filter::{Filter, FilterCommit, Query},
        store::CollectionStore,
    },
    engine::{
        pagination::{PageProjection, Pager},
        search::{SearchPlan, SearchSequence, SearchTicket, hold_until_floor, plan},
        traits::{ConfirmPrompt, NotificationSink, RemoteSource},
    },
    error::{
        CREATE_FALLBACK, ControllerError, DELETE_FALLBACK, RemoteError, StoreError,
        UPDATE_FALLBACK,
    },
    notify::Notification,
    record::{ListRequest, Page, Record},
    types::{LoadSeq, PageNo},
};

use super::{
    config::ControllerConfig,
    events::ViewEvent,
    pending::{ActionKey, ActionLease, PendingActions},
    phase::{FilterPhase, PhaseInput},
};

type RecordOf<S> = <S as RemoteSource>::Record;
type IdOf<S> = <<S as RemoteSource>::Record as Record>::Id;
type Reply<T> = oneshot::Sender<Result<T, ControllerError>>;

/// How a commit of the applied filter resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Blank filter; the view mirrors the cache and nothing was fetched.
    ShowAll,
    /// The cache was filtered locally.
    Local,
    /// A remote query was issued under this ticket.
    Remote(SearchTicket),
    /// The applied filter did not change.
    Unchanged,
}

/// How a delete request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed on the server and locally.
    Deleted,
    /// The user declined the confirmation; no request was sent.
    Declined,
}

/// Point-in-time copy of everything a list screen renders.
#[derive(Debug, Clone)]
pub struct ViewSnapshot<R: Record> {
    /// Filter lifecycle phase.
    pub phase: FilterPhase,
    /// Searching indicator; held for the loading floor when configured.
    pub searching: bool,
    /// Filter bound to the inputs.
    pub draft: Filter,
    /// Filter driving the view.
    pub applied: Filter,
    /// Records in the current page window.
    pub items: Vec<R>,
    /// Length of the whole visible collection.
    pub visible_len: usize,
    /// Cached record count.
    pub cache_len: usize,
    /// Pages over the visible collection.
    pub total_pages: usize,
    /// Current page after clamping.
    pub current_page: PageNo,
    /// Rows per page.
    pub page_size: usize,
    /// Total reported by the server for the last load or search.
    pub server_total: Option<usize>,
    /// Active collection scope (tab).
    pub scope: Option<String>,
    /// Message of the last failed load or search.
    pub error: Option<String>,
    /// True while any mutation is in flight.
    pub saving: bool,
    /// Keys of in-flight mutations.
    pub pending: Vec<ActionKey<R::Id>>,
}

/// Cloneable handle to a running collection view controller.
pub struct ControllerHandle<S: RemoteSource> {
    cmd_tx: mpsc::Sender<Command<S>>,
    events_tx: broadcast::Sender<ViewEvent<IdOf<S>>>,
}

impl<S: RemoteSource> Clone for ControllerHandle<S> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command<S: RemoteSource> {
    Load {
        reset_page: bool,
        resp: Reply<()>,
    },
    SetDraft {
        field: String,
        value: String,
        resp: Reply<()>,
    },
    Commit {
        resp: oneshot::Sender<CommitOutcome>,
    },
    RemoveFilter {
        field: String,
        resp: Reply<CommitOutcome>,
    },
    ClearFilters {
        resp: oneshot::Sender<()>,
    },
    SwitchScope {
        scope: Option<String>,
        resp: Reply<()>,
    },
    SetPage {
        page: PageNo,
        resp: oneshot::Sender<PageProjection>,
    },
    NextPage {
        resp: oneshot::Sender<PageProjection>,
    },
    PrevPage {
        resp: oneshot::Sender<PageProjection>,
    },
    Create {
        payload: S::Payload,
        resp: Reply<RecordOf<S>>,
    },
    Update {
        id: IdOf<S>,
        payload: S::Payload,
        resp: Reply<RecordOf<S>>,
    },
    Delete {
        id: IdOf<S>,
        resp: Reply<DeleteOutcome>,
    },
    Snapshot {
        resp: oneshot::Sender<ViewSnapshot<RecordOf<S>>>,
    },
    Visible {
        resp: oneshot::Sender<Vec<RecordOf<S>>>,
    },
    Cache {
        resp: oneshot::Sender<Vec<RecordOf<S>>>,
    },
    WaitSettled {
        resp: oneshot::Sender<FilterPhase>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

enum Completion<S: RemoteSource> {
    Loaded {
        seq: LoadSeq,
        reset_page: bool,
        result: Result<Page<RecordOf<S>>, RemoteError>,
        resp: Reply<()>,
    },
    Searched {
        ticket: SearchTicket,
        result: Result<Page<RecordOf<S>>, RemoteError>,
    },
    Created {
        result: Result<RecordOf<S>, RemoteError>,
        lease: ActionLease<IdOf<S>>,
        resp: Reply<RecordOf<S>>,
    },
    Updated {
        id: IdOf<S>,
        result: Result<RecordOf<S>, RemoteError>,
        lease: ActionLease<IdOf<S>>,
        resp: Reply<RecordOf<S>>,
    },
    Deleted {
        id: IdOf<S>,
        // `None` when the confirmation was declined.
        result: Option<Result<(), RemoteError>>,
        lease: ActionLease<IdOf<S>>,
        resp: Reply<DeleteOutcome>,
    },
}

/// Starts the controller loop for one collection.
///
/// The cache starts empty; call [`ControllerHandle::load`] to populate it.
/// Dropping every handle (or calling [`ControllerHandle::shutdown`]) stops
/// the loop and aborts in-flight fetches, loading-floor timers and mutations.
pub fn spawn_controller<S, C, N>(
    source: S,
    prompt: C,
    sink: N,
    config: ControllerConfig,
) -> ControllerHandle<S>
where
    S: RemoteSource,
    C: ConfirmPrompt,
    N: NotificationSink,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command<S>>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<ViewEvent<IdOf<S>>>(config.event_capacity.max(1));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion<S>>();

    let mut ctl = Controller {
        source: Arc::new(source),
        prompt: Arc::new(prompt),
        sink,
        store: CollectionStore::new(),
        filters: FilterCommit::new(RecordOf::<S>::FILTER_FIELDS),
        pager: Pager::new(config.page_size),
        phase: FilterPhase::Idle,
        searches: SearchSequence::new(),
        search_task: None,
        load_seq: 0,
        scope: None,
        server_total: None,
        error: None,
        pending: PendingActions::new(),
        settle_waiters: Vec::new(),
        tasks: JoinSet::new(),
        done_tx,
        events_tx: events_tx.clone(),
        config,
    };

    tokio::spawn(async move {
        loop {
            tokio::select! {
                // Commands first: a newer commit invalidates a search result
                // that is already queued.
                biased;
                cmd = cmd_rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if ctl.handle_command(cmd) {
                        break;
                    }
                }
                Some(done) = done_rx.recv() => {
                    ctl.handle_completion(done);
                }
                Some(joined) = ctl.tasks.join_next(), if !ctl.tasks.is_empty() => {
                    if let Err(err) = joined {
                        if err.is_panic() {
                            warn!(error = %err, "controller task panicked");
                        }
                    }
                }
            }
        }
        ctl.tasks.abort_all();
        debug!(entity = RecordOf::<S>::LABEL, "controller stopped");
    });

    ControllerHandle { cmd_tx, events_tx }
}

impl<S: RemoteSource> ControllerHandle<S> {
    /// Receives controller events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent<IdOf<S>>> {
        self.events_tx.subscribe()
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command<S>,
    ) -> Result<T, ControllerError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| ControllerError::ChannelClosed)?;
        rx.await.map_err(|_| ControllerError::ChannelClosed)
    }

    /// Initial load: replaces the cache and resets to page one.
    pub async fn load(&self) -> Result<(), ControllerError> {
        self.call(|resp| Command::Load {
            reset_page: true,
            resp,
        })
        .await?
    }

    /// Reloads the cache, keeping the current page where it still exists.
    pub async fn refresh(&self) -> Result<(), ControllerError> {
        self.call(|resp| Command::Load {
            reset_page: false,
            resp,
        })
        .await?
    }

    /// Edits one draft field. Never fetches.
    pub async fn set_draft(
        &self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ControllerError> {
        let (field, value) = (field.into(), value.into());
        self.call(|resp| Command::SetDraft { field, value, resp })
            .await?
    }

    /// Copies the draft into the applied filter and resolves it.
    pub async fn commit(&self) -> Result<CommitOutcome, ControllerError> {
        self.call(|resp| Command::Commit { resp }).await
    }

    /// Removes one applied field and resolves what remains.
    pub async fn remove_filter(
        &self,
        field: impl Into<String>,
    ) -> Result<CommitOutcome, ControllerError> {
        let field = field.into();
        self.call(|resp| Command::RemoveFilter { field, resp })
            .await?
    }

    /// Clears draft and applied filters and shows the cache.
    pub async fn clear_filters(&self) -> Result<(), ControllerError> {
        self.call(|resp| Command::ClearFilters { resp }).await
    }

    /// Switches the active collection scope (tab) and reloads.
    pub async fn switch_scope(&self, scope: Option<String>) -> Result<(), ControllerError> {
        self.call(|resp| Command::SwitchScope { scope, resp })
            .await?
    }

    /// Moves to `page`, clamped to the visible collection.
    pub async fn set_page(&self, page: PageNo) -> Result<PageProjection, ControllerError> {
        self.call(|resp| Command::SetPage { page, resp }).await
    }

    /// Moves one page forward.
    pub async fn next_page(&self) -> Result<PageProjection, ControllerError> {
        self.call(|resp| Command::NextPage { resp }).await
    }

    /// Moves one page back.
    pub async fn prev_page(&self) -> Result<PageProjection, ControllerError> {
        self.call(|resp| Command::PrevPage { resp }).await
    }

    /// Creates a record and prepends it once the server confirms.
    pub async fn create(&self, payload: S::Payload) -> Result<RecordOf<S>, ControllerError> {
        self.call(|resp| Command::Create { payload, resp }).await?
    }

    /// Updates a record in place once the server confirms.
    pub async fn update(
        &self,
        id: IdOf<S>,
        payload: S::Payload,
    ) -> Result<RecordOf<S>, ControllerError> {
        self.call(|resp| Command::Update { id, payload, resp })
            .await?
    }

    /// Asks for confirmation, then deletes on the server and locally.
    pub async fn delete(&self, id: IdOf<S>) -> Result<DeleteOutcome, ControllerError> {
        self.call(|resp| Command::Delete { id, resp }).await?
    }

    /// Current view state.
    pub async fn snapshot(&self) -> Result<ViewSnapshot<RecordOf<S>>, ControllerError> {
        self.call(|resp| Command::Snapshot { resp }).await
    }

    /// Full visible collection, not just the page window.
    pub async fn visible(&self) -> Result<Vec<RecordOf<S>>, ControllerError> {
        self.call(|resp| Command::Visible { resp }).await
    }

    /// Full cached collection.
    pub async fn cache(&self) -> Result<Vec<RecordOf<S>>, ControllerError> {
        self.call(|resp| Command::Cache { resp }).await
    }

    /// Resolves once no commit or search is in flight.
    pub async fn wait_settled(&self) -> Result<FilterPhase, ControllerError> {
        self.call(|resp| Command::WaitSettled { resp }).await
    }

    /// Stops the loop and aborts everything in flight.
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        self.call(|resp| Command::Shutdown { resp }).await
    }
}

struct Controller<S: RemoteSource, C, N> {
    source: Arc<S>,
    prompt: Arc<C>,
    sink: N,
    config: ControllerConfig,
    store: CollectionStore<RecordOf<S>>,
    filters: FilterCommit,
    pager: Pager,
    phase: FilterPhase,
    searches: SearchSequence,
    search_task: Option<AbortHandle>,
    load_seq: LoadSeq,
    scope: Option<String>,
    server_total: Option<usize>,
    error: Option<String>,
    pending: PendingActions<IdOf<S>>,
    settle_waiters: Vec<oneshot::Sender<FilterPhase>>,
    tasks: JoinSet<()>,
    done_tx: mpsc::UnboundedSender<Completion<S>>,
    events_tx: broadcast::Sender<ViewEvent<IdOf<S>>>,
}

impl<S, C, N> Controller<S, C, N>
where
    S: RemoteSource,
    C: ConfirmPrompt,
    N: NotificationSink,
{
    fn handle_command(&mut self, cmd: Command<S>) -> bool {
        match cmd {
            Command::Load { reset_page, resp } => self.start_load(reset_page, resp),
            Command::SetDraft { field, value, resp } => {
                let _ = resp.send(self.filters.set_draft(&field, value));
            }
            Command::Commit { resp } => {
                self.filters.commit();
                let _ = resp.send(self.resolve(true));
            }
            Command::RemoveFilter { field, resp } => {
                let out = match self.filters.remove_applied(&field) {
                    Ok(true) => Ok(self.resolve(true)),
                    Ok(false) => Ok(CommitOutcome::Unchanged),
                    Err(err) => Err(err),
                };
                let _ = resp.send(out);
            }
            Command::ClearFilters { resp } => {
                self.clear_filters();
                let _ = resp.send(());
            }
            Command::SwitchScope { scope, resp } => {
                debug!(?scope, "switching scope");
                self.scope = scope;
                self.cancel_search();
                if self.phase.is_busy() {
                    self.transition(PhaseInput::Cleared);
                }
                self.pager.reset();
                self.start_load(true, resp);
            }
            Command::SetPage { page, resp } => {
                let projection = self.pager.set_page(page, self.store.visible_len());
                self.emit_visible(projection);
                let _ = resp.send(projection);
            }
            Command::NextPage { resp } => {
                let projection = self.pager.next(self.store.visible_len());
                self.emit_visible(projection);
                let _ = resp.send(projection);
            }
            Command::PrevPage { resp } => {
                let projection = self.pager.prev(self.store.visible_len());
                self.emit_visible(projection);
                let _ = resp.send(projection);
            }
            Command::Create { payload, resp } => self.start_create(payload, resp),
            Command::Update { id, payload, resp } => self.start_update(id, payload, resp),
            Command::Delete { id, resp } => self.start_delete(id, resp),
            Command::Snapshot { resp } => {
                let _ = resp.send(self.snapshot());
            }
            Command::Visible { resp } => {
                let _ = resp.send(self.store.visible().to_vec());
            }
            Command::Cache { resp } => {
                let _ = resp.send(self.store.cache().to_vec());
            }
            Command::WaitSettled { resp } => {
                if self.phase.is_busy() {
                    self.settle_waiters.push(resp);
                } else {
                    let _ = resp.send(self.phase);
                }
            }
            Command::Shutdown { resp } => {
                self.tasks.abort_all();
                self.search_task = None;
                self.release_waiters();
                let _ = resp.send(());
                return true;
            }
        }

        false
    }

    fn handle_completion(&mut self, done: Completion<S>) {
        match done {
            Completion::Loaded {
                seq,
                reset_page,
                result,
                resp,
            } => self.finish_load(seq, reset_page, result, resp),
            Completion::Searched { ticket, result } => self.finish_search(ticket, result),
            Completion::Created {
                result,
                lease,
                resp,
            } => {
                let out = match result {
                    Ok(rec) => {
                        let id = rec.id();
                        if let Err(StoreError::AlreadyExists(_)) = self.store.apply_created(rec.clone()) {
                            warn!(%id, "created record already cached; replacing in place");
                            let _ = self.store.apply_updated(rec.clone());
                        }
                        self.notify(Notification::success(format!(
                            "{} created.",
                            RecordOf::<S>::LABEL
                        )));
                        let _ = self.events_tx.send(ViewEvent::Created { id });
                        self.publish_visible();
                        Ok(rec)
                    }
                    Err(err) => {
                        warn!(error = %err, "create failed");
                        self.notify(Notification::error(err.user_message(CREATE_FALLBACK)));
                        Err(err.into())
                    }
                };
                drop(lease);
                let _ = resp.send(out);
            }
            Completion::Updated {
                id,
                result,
                lease,
                resp,
            } => {
                let out = match result {
                    Ok(rec) => {
                        if let Err(err) = self.store.apply_updated(rec.clone()) {
                            warn!(%id, error = %err, "updated record is no longer held locally");
                        }
                        self.notify(Notification::success(format!(
                            "{} updated.",
                            RecordOf::<S>::LABEL
                        )));
                        let _ = self.events_tx.send(ViewEvent::Updated { id });
                        self.publish_visible();
                        Ok(rec)
                    }
                    Err(err) => {
                        warn!(%id, error = %err, "update failed");
                        self.notify(Notification::error(err.user_message(UPDATE_FALLBACK)));
                        Err(err.into())
                    }
                };
                drop(lease);
                let _ = resp.send(out);
            }
            Completion::Deleted {
                id,
                result,
                lease,
                resp,
            } => {
                let out = match result {
                    None => {
                        debug!(%id, "delete declined");
                        Ok(DeleteOutcome::Declined)
                    }
                    Some(Ok(())) => {
                        if let Err(err) = self.store.apply_deleted(&id) {
                            warn!(%id, error = %err, "deleted record is no longer held locally");
                        }
                        self.notify(Notification::success(format!(
                            "{} deleted.",
                            RecordOf::<S>::LABEL
                        )));
                        let _ = self.events_tx.send(ViewEvent::Deleted { id });
                        self.publish_visible();
                        Ok(DeleteOutcome::Deleted)
                    }
                    Some(Err(err)) => {
                        warn!(%id, error = %err, "delete failed");
                        self.notify(Notification::error(err.user_message(DELETE_FALLBACK)));
                        Err(err.into())
                    }
                };
                drop(lease);
                let _ = resp.send(out);
            }
        }
    }

    /// Resolves the applied filter into the visible collection.
    fn resolve(&mut self, reset_page: bool) -> CommitOutcome {
        self.transition(PhaseInput::Commit);
        if reset_page {
            self.pager.reset();
        }

        match plan(self.filters.applied(), self.config.resolve_mode) {
            SearchPlan::ShowAll => {
                self.cancel_search();
                self.store.show_all();
                self.error = None;
                self.publish_visible();
                self.transition(PhaseInput::ResolvedLocally);
                CommitOutcome::ShowAll
            }
            SearchPlan::Local(query) => {
                self.cancel_search();
                let items = self
                    .store
                    .cache()
                    .iter()
                    .filter(|r| r.matches(&query))
                    .cloned()
                    .collect();
                self.store.show_results(items);
                self.error = None;
                self.publish_visible();
                self.transition(PhaseInput::ResolvedLocally);
                CommitOutcome::Local
            }
            SearchPlan::Remote(query) => {
                let ticket = self.issue_search(query);
                self.transition(PhaseInput::QueryIssued);
                CommitOutcome::Remote(ticket)
            }
        }
    }

    fn clear_filters(&mut self) {
        self.cancel_search();
        self.filters.clear_all();
        self.store.show_all();
        self.error = None;
        self.pager.reset();
        self.publish_visible();
        self.transition(PhaseInput::Cleared);
    }

    fn issue_search(&mut self, query: Query) -> SearchTicket {
        self.cancel_search();
        let ticket = self.searches.issue();
        debug!(ticket = ticket.seq(), fields = query.len(), "search issued");

        let req = ListRequest {
            query,
            scope: self.scope.clone(),
            page: 1,
            page_size: self.config.fetch_limit,
        };
        let source = Arc::clone(&self.source);
        let done = self.done_tx.clone();
        let floor = self.config.minimum_loading();
        let started = Instant::now();
        let span = info_span!(
            "listsync.search",
            entity = RecordOf::<S>::LABEL,
            ticket = ticket.seq()
        );

        let handle = self.tasks.spawn(
            async move {
                let result = source.list(req).await;
                hold_until_floor(started, floor).await;
                let _ = done.send(Completion::Searched { ticket, result });
            }
            .instrument(span),
        );
        self.search_task = Some(handle);
        ticket
    }

    fn cancel_search(&mut self) {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        self.searches.invalidate();
    }

    fn finish_search(&mut self, ticket: SearchTicket, result: Result<Page<RecordOf<S>>, RemoteError>) {
        if !self.searches.is_current(ticket) {
            warn!(ticket = ticket.seq(), "discarding superseded search result");
            let _ = self.events_tx.send(ViewEvent::SearchDiscarded { ticket });
            return;
        }
        self.search_task = None;

        match result {
            Ok(page) => {
                debug!(ticket = ticket.seq(), items = page.items.len(), "search resolved");
                self.server_total = Some(page.total);
                self.store.show_results(page.items);
                self.error = None;
                self.publish_visible();
                self.transition(PhaseInput::QuerySucceeded);
            }
            Err(err) => {
                warn!(ticket = ticket.seq(), error = %err, "search failed");
                self.fail_fetch(&err);
                self.transition(PhaseInput::QueryFailed);
            }
        }
    }

    fn start_load(&mut self, reset_page: bool, resp: Reply<()>) {
        self.load_seq += 1;
        let seq = self.load_seq;
        let req = ListRequest {
            query: Query::new(),
            scope: self.scope.clone(),
            page: 1,
            page_size: self.config.fetch_limit,
        };
        let source = Arc::clone(&self.source);
        let done = self.done_tx.clone();
        let span = info_span!("listsync.load", entity = RecordOf::<S>::LABEL, seq);

        self.tasks.spawn(
            async move {
                let result = source.list(req).await;
                let _ = done.send(Completion::Loaded {
                    seq,
                    reset_page,
                    result,
                    resp,
                });
            }
            .instrument(span),
        );
    }

    fn finish_load(
        &mut self,
        seq: LoadSeq,
        reset_page: bool,
        result: Result<Page<RecordOf<S>>, RemoteError>,
        resp: Reply<()>,
    ) {
        if seq != self.load_seq {
            debug!(seq, latest = self.load_seq, "dropping superseded load");
            let _ = resp.send(Err(ControllerError::Superseded));
            return;
        }

        match result {
            Ok(page) => {
                let len = page.items.len();
                debug!(seq, len, total = page.total, "cache replaced");
                self.server_total = Some(page.total);
                self.store.replace_cache(page.items);
                let _ = self.events_tx.send(ViewEvent::Reloaded { len });
                if reset_page {
                    self.pager.reset();
                }

                if self.filters.applied().is_blank() {
                    self.store.show_all();
                    self.error = None;
                    self.publish_visible();
                } else if self.search_task.is_none() {
                    self.resolve(reset_page);
                }
                let _ = resp.send(Ok(()));
            }
            Err(err) => {
                warn!(seq, error = %err, "load failed");
                self.fail_fetch(&err);
                let _ = resp.send(Err(err.into()));
            }
        }
    }

    fn fail_fetch(&mut self, err: &RemoteError) {
        self.store.show_failed();
        let message = err.fetch_message();
        self.error = Some(message.clone());
        self.notify(Notification::error(message));
        self.publish_visible();
    }

    fn start_create(&mut self, payload: S::Payload, resp: Reply<RecordOf<S>>) {
        let Some(lease) = self.pending.try_acquire(ActionKey::Create) else {
            let _ = resp.send(Err(ControllerError::ActionPending(ActionKey::<IdOf<S>>::Create.to_string())));
            return;
        };
        let source = Arc::clone(&self.source);
        let done = self.done_tx.clone();
        let span = info_span!("listsync.create", entity = RecordOf::<S>::LABEL);

        self.tasks.spawn(
            async move {
                let result = source.create(payload).await;
                let _ = done.send(Completion::Created {
                    result,
                    lease,
                    resp,
                });
            }
            .instrument(span),
        );
    }

    fn start_update(&mut self, id: IdOf<S>, payload: S::Payload, resp: Reply<RecordOf<S>>) {
        let key = ActionKey::Record(id.clone());
        let Some(lease) = self.pending.try_acquire(key.clone()) else {
            let _ = resp.send(Err(ControllerError::ActionPending(key.to_string())));
            return;
        };
        let source = Arc::clone(&self.source);
        let done = self.done_tx.clone();
        let span = info_span!("listsync.update", entity = RecordOf::<S>::LABEL, %id);

        self.tasks.spawn(
            async move {
                let result = source.update(id.clone(), payload).await;
                let _ = done.send(Completion::Updated {
                    id,
                    result,
                    lease,
                    resp,
                });
            }
            .instrument(span),
        );
    }

    fn start_delete(&mut self, id: IdOf<S>, resp: Reply<DeleteOutcome>) {
        let key = ActionKey::Record(id.clone());
        let Some(lease) = self.pending.try_acquire(key.clone()) else {
            let _ = resp.send(Err(ControllerError::ActionPending(key.to_string())));
            return;
        };
        let source = Arc::clone(&self.source);
        let prompt = Arc::clone(&self.prompt);
        let done = self.done_tx.clone();
        let message = format!(
            "Delete {} {id}? This cannot be undone.",
            RecordOf::<S>::LABEL.to_lowercase()
        );
        let span = info_span!("listsync.delete", entity = RecordOf::<S>::LABEL, %id);

        self.tasks.spawn(
            async move {
                let result = if prompt.confirm(message).await {
                    Some(source.delete(id.clone()).await)
                } else {
                    None
                };
                let _ = done.send(Completion::Deleted {
                    id,
                    result,
                    lease,
                    resp,
                });
            }
            .instrument(span),
        );
    }

    fn transition(&mut self, input: PhaseInput) {
        let Some(next) = self.phase.next(input) else {
            debug!(phase = ?self.phase, ?input, "ignored phase input");
            return;
        };
        if next != self.phase {
            debug!(from = ?self.phase, to = ?next, "filter phase changed");
            self.phase = next;
            let _ = self.events_tx.send(ViewEvent::PhaseChanged { phase: next });
        }
        if !next.is_busy() {
            self.release_waiters();
        }
    }

    fn release_waiters(&mut self) {
        let phase = self.phase;
        for waiter in self.settle_waiters.drain(..) {
            let _ = waiter.send(phase);
        }
    }

    /// Re-projects pages after the visible collection changed; only clamps.
    fn publish_visible(&mut self) {
        let len = self.store.visible_len();
        if self.pager.clamp_to(len) {
            debug!(page = self.pager.current_page(), "current page clamped");
        }
        self.emit_visible(self.pager.projection(len));
    }

    fn emit_visible(&self, projection: PageProjection) {
        let _ = self.events_tx.send(ViewEvent::VisibleChanged {
            len: self.store.visible_len(),
            total_pages: projection.total_pages,
            current_page: projection.current_page,
        });
    }

    fn notify(&self, notification: Notification) {
        self.sink.notify(notification.clone());
        let _ = self.events_tx.send(ViewEvent::Notified { notification });
    }

    fn snapshot(&self) -> ViewSnapshot<RecordOf<S>> {
        let visible = self.store.visible();
        let projection = self.pager.projection(visible.len());
        ViewSnapshot {
            phase: self.phase,
            searching: self.phase == FilterPhase::Loading,
            draft: self.filters.draft().clone(),
            applied: self.filters.applied().clone(),
            items: projection.window(visible).to_vec(),
            visible_len: visible.len(),
            cache_len: self.store.len(),
            total_pages: projection.total_pages,
            current_page: projection.current_page,
            page_size: self.pager.page_size(),
            server_total: self.server_total,
            scope: self.scope.clone(),
            error: self.error.clone(),
            saving: self.pending.saving(),
            pending: self.pending.keys(),
        }
    }
}
