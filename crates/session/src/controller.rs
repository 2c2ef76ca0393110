use std::collections::{BTreeMap, BTreeSet};

use catalog::{IndicatorKind, ReferenceCatalog, Resolution};
use foundation::math::{LonLat, Vec2};
use indicators::{AggregatedValue, EntityMode, IndicatorRecord, aggregate, max_of_type};
use overlay::{
    BalanceSnapshot, CirclesSnapshot, ColorRegistry, FlowsSnapshot, LegendScale, OverlayMode,
    RegionShade, extract_balance, extract_circles, extract_flows, outline_width,
    reconcile_circles, reconcile_flows,
};
use projection::{ProjectionFactory, ProjectionHandle, ProjectionOptions, Rotation};
use runtime::event_bus::EventBus;
use runtime::frame::Frame;
use runtime::transitions::Transitions;
use topology::{LoadStart, LoadTicket, Topology, TopologyError, TopologyStore, merge_by_continent};
use view::{GlobeDrag, ViewState, ZoomExtent, drag_pan, wheel_scale, wheel_zoom};

use crate::config::AtlasConfig;
use crate::errors::SessionError;
use crate::hit::{pick_circle, pick_region};

const BASE_OUTLINE_WIDTH: f64 = 1.0;

/// Pick tolerance around a flow endpoint, in screen pixels.
const FLOW_PICK_RADIUS: f64 = 12.0;

/// Lifecycle of the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading,
    Ready,
}

/// A fetch the host must issue on the controller's behalf.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: u64,
    pub ticket: LoadTicket,
    pub resolution: Resolution,
}

/// What became of a delivered fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(Resolution),
    /// Superseded or unknown; dropped without any visible effect.
    Discarded,
    /// Transport or decode failure; prior geometry retained, message
    /// rendered inline.
    Failed(String),
}

/// Hover payload handed to the host's tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipPayload {
    pub entity: String,
    pub year: u16,
    pub month_id: u8,
    pub value: Option<f64>,
}

/// Emitted on click; `selected` is the full selection after the click.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub entity: String,
    pub multiple: bool,
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlaySnapshot {
    Circles(CirclesSnapshot),
    Flows(FlowsSnapshot),
    Balance(BalanceSnapshot),
}

/// One rendered frame: the overlay display list plus toolbar outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasFrame {
    pub overlay: OverlaySnapshot,
    pub rendered_entities: usize,
    pub outline_width: f64,
    /// Inline message when the last topology load failed.
    pub error: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct PendingLoad {
    token: u64,
    ticket: LoadTicket,
}

/// The interactive session.
///
/// Single-threaded and host-driven: the host forwards pointer events,
/// delivers fetch completions, and advances frames; everything else is
/// synchronous. All registries live here as plain fields, mutated only
/// through the methods below, and every mutation is idempotent under
/// repeated application so redundant paint callbacks are harmless.
#[derive(Debug)]
pub struct AtlasSession {
    config: AtlasConfig,
    tables: ReferenceCatalog,
    records_by_year: BTreeMap<u16, Vec<IndicatorRecord>>,

    store: TopologyStore,
    projection: ProjectionHandle,
    view: ViewState,
    /// Full globe orientation including roll; the view state only carries
    /// the derived center.
    rotation: Rotation,
    zoom_extent: ZoomExtent,

    transitions: Transitions,
    colors: ColorRegistry,
    selection: BTreeSet<String>,
    drag: Option<GlobeDrag>,

    bus: EventBus,
    frame: Frame,

    state: ControllerState,
    load_token: u64,
    pending: Option<PendingLoad>,

    agg: AggregatedValue,
    anchors: BTreeMap<String, LonLat>,
    /// Display topology for the current entity mode (merged in continent
    /// mode); rebuilt on apply and on mode change.
    regions: Topology,
    error: Option<String>,
}

impl AtlasSession {
    /// Builds the session. An unknown projection family is fatal here; it
    /// is a configuration defect, not a runtime condition.
    pub fn new(config: AtlasConfig, tables: ReferenceCatalog) -> Result<Self, SessionError> {
        let projection = Self::build_projection(&config)?;
        let initial_center = config.initial_center;
        let view = ViewState::new(
            Vec2::new(config.viewport.x / 2.0, config.viewport.y / 2.0),
            initial_center,
        );
        let mut session = Self {
            config,
            tables,
            records_by_year: BTreeMap::new(),
            store: TopologyStore::new(),
            projection,
            view,
            rotation: Rotation::centering(initial_center),
            zoom_extent: ZoomExtent::default(),
            transitions: Transitions::new(),
            colors: ColorRegistry::new(),
            selection: BTreeSet::new(),
            drag: None,
            bus: EventBus::new(),
            frame: Frame::new(0, 1.0 / 60.0),
            state: ControllerState::Idle,
            load_token: 0,
            pending: None,
            agg: AggregatedValue::new(),
            anchors: BTreeMap::new(),
            regions: Topology::default(),
            error: None,
        };
        session.refresh_aggregation();
        Ok(session)
    }

    fn build_projection(config: &AtlasConfig) -> Result<ProjectionHandle, SessionError> {
        let mut options = ProjectionOptions::fit(config.viewport, config.base_scale);
        options.rotation = Rotation::centering(config.initial_center);
        Ok(ProjectionFactory::create(
            &config.projection_family,
            options,
        )?)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn selection(&self) -> impl Iterator<Item = &str> {
        self.selection.iter().map(|s| s.as_str())
    }

    /// Begins the first topology load. Idempotent once loading started.
    pub fn start(&mut self) -> Option<FetchRequest> {
        if self.state != ControllerState::Idle {
            return None;
        }
        self.begin_topology_load()
    }

    /// Applies a new configuration.
    ///
    /// The projection is rebuilt with the current geographic center
    /// preserved; any change bumps the load token so an in-flight fetch
    /// for the old configuration is silently discarded on arrival.
    pub fn reconfigure(&mut self, config: AtlasConfig) -> Result<Option<FetchRequest>, SessionError> {
        if config == self.config {
            return Ok(None);
        }
        let center = self.view.center();
        let zoom = self.view.zoom();
        let mut rebuilt = Self::build_projection(&config)?;
        if rebuilt.is_globe() {
            rebuilt.set_rotation(Rotation::centering(center));
        }
        self.projection = rebuilt;
        self.rotation = Rotation::centering(center);
        self.drag = None;
        if config.viewport != self.config.viewport {
            self.view = ViewState::new(
                Vec2::new(config.viewport.x / 2.0, config.viewport.y / 2.0),
                center,
            );
            self.view.apply_globe_rotation(zoom, self.rotation);
        }
        self.config = config;
        self.refresh_aggregation();
        self.refresh_regions();
        Ok(self.begin_topology_load())
    }

    /// Supplies one year of raw records. A missing year simply renders
    /// nothing; the session never blocks on data.
    pub fn supply_year(&mut self, year: u16, records: Vec<IndicatorRecord>) {
        self.records_by_year.insert(year, records);
        if year == self.config.year {
            self.refresh_aggregation();
        }
    }

    fn begin_topology_load(&mut self) -> Option<FetchRequest> {
        self.load_token += 1;
        let token = self.load_token;
        let resolution = self.config.resolution;
        self.bus.emit(
            self.frame,
            "load_begin",
            format!("token={token} scale={}", resolution.scale()),
        );
        match self.store.begin_load(resolution) {
            LoadStart::Ready => {
                self.pending = None;
                self.apply_loaded_topology(token);
                None
            }
            LoadStart::Fetch(ticket) | LoadStart::Joined(ticket) => {
                self.state = ControllerState::Loading;
                self.pending = Some(PendingLoad { token, ticket });
                Some(FetchRequest {
                    token,
                    ticket,
                    resolution,
                })
            }
        }
    }

    /// Delivers a fetch result. Stale completions (superseded token or
    /// unknown ticket) are discarded without surfacing anything.
    pub fn complete_fetch(
        &mut self,
        ticket: LoadTicket,
        payload: Result<&str, String>,
    ) -> LoadOutcome {
        let current = self
            .pending
            .filter(|p| p.ticket == ticket && p.token == self.load_token);

        match self.store.complete_load(ticket, payload) {
            Ok(resolution) => match current {
                Some(p) => {
                    self.pending = None;
                    self.apply_loaded_topology(p.token);
                    LoadOutcome::Applied(resolution)
                }
                None => {
                    self.bus
                        .emit(self.frame, "load_discard", format!("ticket={}", ticket.0));
                    LoadOutcome::Discarded
                }
            },
            Err(TopologyError::UnknownTicket(raw)) => {
                self.bus
                    .emit(self.frame, "load_discard", format!("ticket={raw}"));
                LoadOutcome::Discarded
            }
            Err(err) => match current {
                Some(_) => {
                    self.pending = None;
                    self.state = ControllerState::Ready;
                    let message = err.to_string();
                    self.error = Some(message.clone());
                    self.bus.emit(self.frame, "load_fail", message.clone());
                    LoadOutcome::Failed(message)
                }
                None => {
                    self.bus
                        .emit(self.frame, "load_discard", format!("ticket={}", ticket.0));
                    LoadOutcome::Discarded
                }
            },
        }
    }

    fn apply_loaded_topology(&mut self, token: u64) {
        self.state = ControllerState::Ready;
        self.error = None;
        self.refresh_regions();
        self.bus.emit(
            self.frame,
            "load_apply",
            format!("token={token} features={}", self.regions.len()),
        );
    }

    fn refresh_regions(&mut self) {
        let Some(countries) = self.store.get(self.config.resolution) else {
            self.regions = Topology::default();
            return;
        };
        self.regions = match self.config.entity_mode {
            EntityMode::Countries => countries.clone(),
            EntityMode::Continents => merge_by_continent(countries, &self.tables),
        };
    }

    fn refresh_aggregation(&mut self) {
        let records = self
            .records_by_year
            .get(&self.config.year)
            .map(|r| r.as_slice())
            .unwrap_or(&[]);
        self.agg = aggregate(
            records,
            self.config.month_id,
            &self.config.products,
            self.config.entity_mode,
            &self.tables,
        );
        self.anchors = match self.config.entity_mode {
            EntityMode::Countries => self
                .tables
                .countries()
                .map(|c| (c.name.clone(), c.centroid_lonlat()))
                .collect(),
            EntityMode::Continents => self
                .tables
                .continents()
                .map(|c| (c.name.clone(), c.centroid_lonlat()))
                .collect(),
        };
    }

    /// Advances the frame clock and the overlay tweens.
    pub fn advance_frame(&mut self) {
        self.transitions.advance(self.frame.dt_s);
        self.frame = self.frame.next();
    }

    fn overlay_mode(&self) -> OverlayMode {
        if self.config.indicator == IndicatorKind::Balance {
            OverlayMode::Balance
        } else {
            match self.config.entity_mode {
                EntityMode::Countries => OverlayMode::Proportional,
                EntityMode::Continents => OverlayMode::Flow,
            }
        }
    }

    fn markers_static(&self) -> bool {
        // Globe markers scale with the view regardless of the flag.
        !self.projection.is_globe() && self.config.static_markers
    }

    /// The projection with the current view baked in, used for extraction
    /// and picking.
    fn view_projection(&self) -> ProjectionHandle {
        let mut p = self.projection;
        p.set_scale(self.config.base_scale * self.view.zoom());
        if p.is_globe() {
            p.set_rotation(self.rotation);
        } else {
            p.center_on(self.view.center(), self.view.viewport_center());
        }
        p
    }

    /// Extracts the current frame's overlay snapshot.
    pub fn render(&mut self) -> AtlasFrame {
        let k = self.view.zoom();
        let proj = self.view_projection();
        let type_id = self.config.indicator.type_id();

        let (overlay, rendered_entities) = match self.overlay_mode() {
            OverlayMode::Proportional => {
                let max = max_of_type(&self.agg, type_id).unwrap_or(0.0);
                let scale = LegendScale::radius(max, self.markers_static());
                reconcile_circles(&mut self.transitions, &self.agg, type_id, &scale, k);
                let snap = extract_circles(
                    &self.transitions,
                    &self.agg,
                    type_id,
                    &self.anchors,
                    &proj,
                    &mut self.colors,
                    &scale,
                    k,
                );
                let count = snap.markers.len();
                (OverlaySnapshot::Circles(snap), count)
            }
            OverlayMode::Flow => {
                let max = max_of_type(&self.agg, type_id).unwrap_or(0.0);
                let scale = LegendScale::stroke(max, self.markers_static());
                reconcile_flows(&mut self.transitions, &self.agg, type_id);
                let snap = extract_flows(
                    &self.transitions,
                    &self.agg,
                    type_id,
                    &self.anchors,
                    &proj,
                    &scale,
                    k,
                );
                let count = snap.arcs.len();
                (OverlaySnapshot::Flows(snap), count)
            }
            OverlayMode::Balance => {
                let entities: Vec<String> =
                    self.regions.features.iter().map(|f| f.name.clone()).collect();
                let snap = extract_balance(
                    &entities,
                    &self.agg,
                    self.config.balance_measure,
                    self.config.balance_kind,
                    self.config.cvd,
                );
                let count = snap
                    .fills
                    .iter()
                    .filter(|f| !matches!(f.shade, RegionShade::NoData))
                    .count();
                (OverlaySnapshot::Balance(snap), count)
            }
        };

        AtlasFrame {
            overlay,
            rendered_entities,
            outline_width: outline_width(BASE_OUTLINE_WIDTH, k),
            error: self.error.clone(),
        }
    }

    // ---- gestures ------------------------------------------------------

    /// Wheel zoom, routed per family: anchored pan/zoom on planar maps,
    /// scale-only on the globe.
    pub fn on_wheel(&mut self, pointer: Vec2, factor: f64) {
        if self.projection.is_globe() {
            let k = wheel_scale(self.view.zoom(), factor, self.zoom_extent);
            self.view.apply_globe_rotation(k, self.rotation);
        } else if let Some(t) = self.view.unified_transform(&self.projection) {
            let zoomed = wheel_zoom(t, pointer, factor, self.zoom_extent);
            self.view
                .apply_planar_transform(&self.projection, zoomed.k, zoomed.x, zoomed.y);
        }
    }

    pub fn on_drag_start(&mut self, pointer: Vec2) {
        if self.projection.is_globe() {
            self.drag = GlobeDrag::begin(&self.view_projection(), pointer);
        }
    }

    /// Pointer drag: versor rotation on the globe, translation pan on
    /// planar maps (`delta` in screen pixels).
    pub fn on_drag_move(&mut self, pointer: Vec2, delta: Vec2) {
        if self.projection.is_globe() {
            let proj = self.view_projection();
            if let Some(drag) = self.drag.as_mut() {
                if let Some(rotation) = drag.drag(&proj, pointer) {
                    self.rotation = rotation;
                    self.view.apply_globe_rotation(self.view.zoom(), rotation);
                }
            }
        } else if let Some(t) = self.view.unified_transform(&self.projection) {
            let panned = drag_pan(t, delta);
            self.view
                .apply_planar_transform(&self.projection, panned.k, panned.x, panned.y);
        }
    }

    pub fn on_drag_end(&mut self) {
        self.drag = None;
    }

    // ---- picking -------------------------------------------------------

    fn entity_at(&mut self, pointer: Vec2) -> Option<String> {
        let proj = self.view_projection();
        match self.overlay_mode() {
            OverlayMode::Balance => {
                let geo = proj.invert(pointer)?;
                pick_region(&self.regions, geo).map(|s| s.to_string())
            }
            OverlayMode::Flow => {
                let type_id = self.config.indicator.type_id();
                let mut best: Option<(f64, &String)> = None;
                for (name, anchor) in &self.anchors {
                    if !self.agg.get(name).is_some_and(|t| t.contains_key(&type_id)) {
                        continue;
                    }
                    let Some(p) = proj.forward(*anchor) else {
                        continue;
                    };
                    let dx = pointer.x - p.x;
                    let dy = pointer.y - p.y;
                    let d = (dx * dx + dy * dy).sqrt();
                    if d <= FLOW_PICK_RADIUS && best.is_none_or(|(bd, _)| d < bd) {
                        best = Some((d, name));
                    }
                }
                best.map(|(_, name)| name.clone())
            }
            OverlayMode::Proportional => {
                let k = self.view.zoom();
                let type_id = self.config.indicator.type_id();
                let max = max_of_type(&self.agg, type_id).unwrap_or(0.0);
                let scale = LegendScale::radius(max, self.markers_static());
                let snap = extract_circles(
                    &self.transitions,
                    &self.agg,
                    type_id,
                    &self.anchors,
                    &proj,
                    &mut self.colors,
                    &scale,
                    k,
                );
                pick_circle(&snap.markers, pointer).map(|m| m.entity.clone())
            }
        }
    }

    /// Hover: tooltip payload for the entity under the pointer.
    pub fn on_hover(&mut self, pointer: Vec2) -> Option<TooltipPayload> {
        let entity = self.entity_at(pointer)?;
        let value = self
            .agg
            .get(&entity)
            .and_then(|t| t.get(&self.config.indicator.type_id()))
            .copied();
        Some(TooltipPayload {
            entity,
            year: self.config.year,
            month_id: self.config.month_id,
            value,
        })
    }

    /// Click selection.
    ///
    /// Single mode replaces the selection, and re-clicking the selected
    /// entity clears it; multiple mode toggles membership.
    pub fn on_click(&mut self, pointer: Vec2, multiple: bool) -> Option<SelectionEvent> {
        let entity = self.entity_at(pointer)?;
        if multiple {
            if !self.selection.remove(&entity) {
                self.selection.insert(entity.clone());
            }
        } else if self.selection.len() == 1 && self.selection.contains(&entity) {
            self.selection.clear();
        } else {
            self.selection.clear();
            self.selection.insert(entity.clone());
        }
        let event = SelectionEvent {
            entity: entity.clone(),
            multiple,
            selected: self.selection.iter().cloned().collect(),
        };
        self.bus.emit(
            self.frame,
            "select",
            format!("entity={entity} multiple={multiple}"),
        );
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::{AtlasSession, ControllerState, LoadOutcome, OverlaySnapshot};
    use crate::config::AtlasConfig;
    use catalog::{Continent, Country, IndicatorKind, ReferenceCatalog, Resolution};
    use foundation::math::Vec2;
    use indicators::{EntityMode, IndicatorRecord};
    use pretty_assertions::assert_eq;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "properties": {"name": "country1"},
                "geometry": {"type": "Polygon", "coordinates": [[[-5.0, 40.0], [10.0, 40.0], [10.0, 52.0], [-5.0, 52.0]]]}
            },
            {
                "properties": {"name": "country2"},
                "geometry": {"type": "Polygon", "coordinates": [[[12.0, 40.0], [25.0, 40.0], [25.0, 52.0], [12.0, 52.0]]]}
            }
        ]
    }"#;

    fn tables() -> ReferenceCatalog {
        ReferenceCatalog::from_tables(
            vec![
                Country {
                    id: 1,
                    code: "AAA".to_string(),
                    name: "country1".to_string(),
                    continent: "EU".to_string(),
                    centroid: [2.0, 46.0],
                },
                Country {
                    id: 2,
                    code: "BBB".to_string(),
                    name: "country2".to_string(),
                    continent: "EU".to_string(),
                    centroid: [18.0, 46.0],
                },
            ],
            vec![Continent {
                name: "EU".to_string(),
                centroid: [15.0, 54.0],
            }],
        )
        .unwrap()
    }

    fn session() -> AtlasSession {
        AtlasSession::new(AtlasConfig::default(), tables()).unwrap()
    }

    fn records() -> Vec<IndicatorRecord> {
        vec![
            IndicatorRecord::new(1, 2, 0, 0, 120.0),
            IndicatorRecord::new(1, 3, 0, 0, 200.0),
            IndicatorRecord::new(2, 2, 0, 0, 60.0),
        ]
    }

    #[test]
    fn unknown_family_is_fatal_at_construction() {
        let mut config = AtlasConfig::default();
        config.projection_family = "winkel-tripel".to_string();
        assert!(AtlasSession::new(config, tables()).is_err());
    }

    #[test]
    fn load_lifecycle_idle_loading_ready() {
        let mut s = session();
        assert_eq!(s.state(), ControllerState::Idle);

        let req = s.start().expect("first load should need a fetch");
        assert_eq!(s.state(), ControllerState::Loading);
        assert_eq!(req.resolution, Resolution::Low);

        let outcome = s.complete_fetch(req.ticket, Ok(WORLD));
        assert_eq!(outcome, LoadOutcome::Applied(Resolution::Low));
        assert_eq!(s.state(), ControllerState::Ready);
        assert_eq!(s.bus().events_of_kind("load_apply").count(), 1);
    }

    #[test]
    fn stale_token_response_is_discarded() {
        let mut s = session();
        let first = s.start().unwrap();

        // Reconfigure to a different resolution before the first fetch
        // lands; this supersedes the first token.
        let mut config = s.config().clone();
        config.resolution = Resolution::High;
        let second = s.reconfigure(config).unwrap().unwrap();
        assert!(second.token > first.token);

        // The newer load resolves first and is applied.
        assert_eq!(
            s.complete_fetch(second.ticket, Ok(WORLD)),
            LoadOutcome::Applied(Resolution::High)
        );

        // The older one resolves late and is dropped silently.
        assert_eq!(s.complete_fetch(first.ticket, Ok(WORLD)), LoadOutcome::Discarded);
        assert_eq!(s.state(), ControllerState::Ready);
        assert_eq!(s.config().resolution, Resolution::High);
        assert_eq!(s.bus().events_of_kind("load_discard").count(), 1);
    }

    #[test]
    fn fetch_failure_renders_inline_and_allows_retry() {
        let mut s = session();
        let req = s.start().unwrap();
        let outcome = s.complete_fetch(req.ticket, Err("connection reset".to_string()));
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(s.state(), ControllerState::Ready);

        let frame = s.render();
        assert!(frame.error.is_some());

        // The next configuration change retries the fetch.
        let mut config = s.config().clone();
        config.resolution = Resolution::Medium;
        assert!(s.reconfigure(config).unwrap().is_some());
    }

    #[test]
    fn cached_resolution_applies_without_fetch() {
        let mut s = session();
        let req = s.start().unwrap();
        s.complete_fetch(req.ticket, Ok(WORLD));

        let mut config = s.config().clone();
        config.resolution = Resolution::Medium;
        let second = s.reconfigure(config).unwrap().unwrap();
        s.complete_fetch(second.ticket, Ok(WORLD));

        // Back to the first resolution: cache answers synchronously.
        let mut config = s.config().clone();
        config.resolution = Resolution::Low;
        assert!(s.reconfigure(config).unwrap().is_none());
        assert_eq!(s.state(), ControllerState::Ready);
    }

    #[test]
    fn render_counts_entities_per_mode() {
        let mut s = session();
        let req = s.start().unwrap();
        s.complete_fetch(req.ticket, Ok(WORLD));
        s.supply_year(2024, records());

        let frame = s.render();
        assert_eq!(frame.rendered_entities, 2);
        assert!(matches!(frame.overlay, OverlaySnapshot::Circles(_)));

        let mut config = s.config().clone();
        config.indicator = IndicatorKind::Balance;
        s.reconfigure(config).unwrap();
        let frame = s.render();
        let OverlaySnapshot::Balance(snap) = &frame.overlay else {
            panic!("expected a balance snapshot");
        };
        // country1 has both series; country2 only exports.
        assert_eq!(snap.fills.len(), 2);
        assert_eq!(frame.rendered_entities, 2);
    }

    #[test]
    fn flow_mode_extracts_continent_arcs() {
        let mut s = session();
        let req = s.start().unwrap();
        s.complete_fetch(req.ticket, Ok(WORLD));
        s.supply_year(2024, records());

        let mut config = s.config().clone();
        config.entity_mode = EntityMode::Continents;
        s.reconfigure(config).unwrap();
        let frame = s.render();
        let OverlaySnapshot::Flows(snap) = &frame.overlay else {
            panic!("expected a flow snapshot");
        };
        assert_eq!(snap.arcs.len(), 1);
        assert_eq!(snap.arcs[0].entity, "EU");
    }

    #[test]
    fn missing_year_renders_nothing() {
        let mut s = session();
        let req = s.start().unwrap();
        s.complete_fetch(req.ticket, Ok(WORLD));

        let frame = s.render();
        assert_eq!(frame.rendered_entities, 0);
    }

    #[test]
    fn click_selection_single_and_multiple() {
        let mut s = session();
        let req = s.start().unwrap();
        s.complete_fetch(req.ticket, Ok(WORLD));
        s.supply_year(2024, records());
        // Settle the enter animation so markers are pickable.
        s.render();
        for _ in 0..30 {
            s.advance_frame();
        }
        let frame = s.render();
        let OverlaySnapshot::Circles(snap) = &frame.overlay else {
            panic!("expected circles");
        };
        let target = snap
            .markers
            .iter()
            .find(|m| m.entity == "country1")
            .unwrap()
            .center;

        let event = s.on_click(target, false).unwrap();
        assert_eq!(event.selected, vec!["country1".to_string()]);

        // Re-click in single mode clears the selection.
        let event = s.on_click(target, false).unwrap();
        assert!(event.selected.is_empty());

        // Multiple mode toggles membership.
        s.on_click(target, true).unwrap();
        let other = snap
            .markers
            .iter()
            .find(|m| m.entity == "country2")
            .unwrap()
            .center;
        let event = s.on_click(other, true).unwrap();
        assert_eq!(event.selected.len(), 2);
        let event = s.on_click(other, true).unwrap();
        assert_eq!(event.selected, vec!["country1".to_string()]);
    }

    #[test]
    fn hover_reports_tooltip_payload() {
        let mut s = session();
        let req = s.start().unwrap();
        s.complete_fetch(req.ticket, Ok(WORLD));
        s.supply_year(2024, records());
        s.render();
        for _ in 0..30 {
            s.advance_frame();
        }
        let frame = s.render();
        let OverlaySnapshot::Circles(snap) = &frame.overlay else {
            panic!("expected circles");
        };
        let target = snap
            .markers
            .iter()
            .find(|m| m.entity == "country1")
            .unwrap()
            .center;

        let tip = s.on_hover(target).unwrap();
        assert_eq!(tip.entity, "country1");
        assert_eq!(tip.year, 2024);
        assert_eq!(tip.value, Some(120.0));
        assert!(s.on_hover(Vec2::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn family_switch_preserves_view_center() {
        let mut s = session();
        let req = s.start().unwrap();
        s.complete_fetch(req.ticket, Ok(WORLD));

        // Zoom toward a spot so the center moves off the origin.
        s.on_wheel(Vec2::new(600.0, 200.0), 2.0);
        let before = s.view().center();

        let mut config = s.config().clone();
        config.projection_family = "orthographic".to_string();
        s.reconfigure(config).unwrap();
        let after = s.view().center();
        assert!((after.lon - before.lon).abs() < 1e-6);
        assert!((after.lat - before.lat).abs() < 1e-6);
    }

    #[test]
    fn wheel_routes_per_family() {
        let mut s = session();
        s.on_wheel(Vec2::new(480.0, 250.0), 2.0);
        assert!((s.view().zoom() - 2.0).abs() < 1e-12);

        let mut config = s.config().clone();
        config.projection_family = "orthographic".to_string();
        s.reconfigure(config).unwrap();
        let before = s.view().center();
        s.on_wheel(Vec2::new(100.0, 100.0), 1.5);
        // Globe wheel is scale-only: the center must not move.
        assert!((s.view().zoom() - 3.0).abs() < 1e-12);
        assert_eq!(s.view().center(), before);
    }
}
