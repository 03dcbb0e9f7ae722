//! Body hierarchy for patched-conic prediction.
//!
//! Bodies live in one arena owned by [`BodySystem`] and refer to each other by
//! [`BodyId`]. Every body except the root carries an [`Orbit`] around its parent,
//! evaluated at the global simulation time plus the body's own phase offset.

use std::fmt;

use solar_config::{BodyConfig, OrbitConfig};
use solar_core::state::StateVector;
use solar_orbits::{Orbit, OrbitalElements, Primary};
use thiserror::Error;

/// Stable index of a body inside its [`BodySystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Physical description of a body before it is placed in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDefinition {
    pub name: String,
    pub mu: f64,
    /// `f64::INFINITY` when unbounded.
    pub soi_radius: f64,
    pub starting_t: f64,
}

impl BodyDefinition {
    pub fn new(name: impl Into<String>, mu: f64, soi_radius: f64) -> Self {
        Self {
            name: name.into(),
            mu,
            soi_radius,
            starting_t: 0.0,
        }
    }

    pub fn with_starting_t(mut self, starting_t: f64) -> Self {
        self.starting_t = starting_t;
        self
    }
}

/// A gravitating body placed in the hierarchy.
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    mu: f64,
    soi_radius: f64,
    starting_t: f64,
    orbit: Option<Orbit>,
    parent: Option<BodyId>,
    children: Vec<BodyId>,
}

impl Body {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn soi_radius(&self) -> f64 {
        self.soi_radius
    }

    pub fn starting_t(&self) -> f64 {
        self.starting_t
    }

    /// Orbit around the parent; `None` only for the root.
    pub fn orbit(&self) -> Option<&Orbit> {
        self.orbit.as_ref()
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn children(&self) -> &[BodyId] {
        &self.children
    }

    /// Gravity source handed to orbits expressed around this body.
    pub fn primary(&self) -> Primary {
        Primary::new(self.mu, self.soi_radius)
    }

    /// State relative to the parent at global time `t`. The root sits at the origin.
    pub fn state_vector(&self, t: f64) -> StateVector {
        self.orbit
            .as_ref()
            .map(|orbit| orbit.state_vector(t + self.starting_t))
            .unwrap_or(StateVector::ZERO)
    }
}

/// Errors raised while assembling or querying a body hierarchy.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("unknown body `{0}`")]
    UnknownBody(String),
    #[error("body `{body}` refers to unknown parent `{parent}`")]
    UnknownParent { body: String, parent: String },
    #[error("duplicate body name `{0}`")]
    DuplicateBody(String),
    #[error("catalog has no root body (every body names a parent)")]
    MissingRoot,
    #[error("catalog has more than one root body: `{0}` and `{1}`")]
    MultipleRoots(String, String),
    #[error("body `{0}` has a parent but no orbit")]
    MissingOrbit(String),
    #[error("body `{0}` orbits a parent but has no finite sphere of influence")]
    UnboundedChild(String),
}

/// Arena of bodies forming a single tree.
#[derive(Debug, Clone)]
pub struct BodySystem {
    bodies: Vec<Body>,
}

impl BodySystem {
    /// Start a hierarchy with its root body.
    pub fn new(root: BodyDefinition) -> Self {
        if root.soi_radius.is_finite() {
            log::warn!(
                "root body `{}` has a finite sphere of influence ({}); predictions never leave it",
                root.name,
                root.soi_radius
            );
        }
        Self {
            bodies: vec![Body {
                name: root.name,
                mu: root.mu,
                soi_radius: root.soi_radius,
                starting_t: root.starting_t,
                orbit: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Attach a body orbiting `parent` with the given elements (angles in radians).
    pub fn add_body(
        &mut self,
        parent: BodyId,
        definition: BodyDefinition,
        elements: OrbitalElements,
    ) -> Result<BodyId, EphemerisError> {
        if self.find(&definition.name).is_some() {
            return Err(EphemerisError::DuplicateBody(definition.name));
        }
        // entry searches need a finite SOI around every child
        if !definition.soi_radius.is_finite() {
            return Err(EphemerisError::UnboundedChild(definition.name));
        }
        let parent_body = self
            .bodies
            .get(parent.0)
            .ok_or_else(|| EphemerisError::UnknownBody(parent.to_string()))?;
        let orbit = Orbit::from_elements(parent_body.primary(), elements);

        let id = BodyId(self.bodies.len());
        log::debug!("adding body `{}` as {} under {}", definition.name, id, parent);
        self.bodies.push(Body {
            name: definition.name,
            mu: definition.mu,
            soi_radius: definition.soi_radius,
            starting_t: definition.starting_t,
            orbit: Some(orbit),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.bodies[parent.0].children.push(id);
        Ok(id)
    }

    /// Build a hierarchy from catalog records. Parents may appear after their children.
    pub fn from_configs(configs: &[BodyConfig]) -> Result<Self, EphemerisError> {
        let mut roots = configs.iter().filter(|config| config.parent.is_none());
        let root = roots.next().ok_or(EphemerisError::MissingRoot)?;
        if let Some(other) = roots.next() {
            return Err(EphemerisError::MultipleRoots(
                root.name.clone(),
                other.name.clone(),
            ));
        }

        let mut system = Self::new(definition_from_config(root));
        let mut pending: Vec<&BodyConfig> = configs
            .iter()
            .filter(|config| config.parent.is_some())
            .collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for config in pending {
                let parent_name = config.parent.as_deref().unwrap_or_default();
                match system.find(parent_name) {
                    Some(parent) => {
                        let orbit = config
                            .orbit
                            .as_ref()
                            .ok_or_else(|| EphemerisError::MissingOrbit(config.name.clone()))?;
                        system.add_body(
                            parent,
                            definition_from_config(config),
                            elements_from_config(orbit),
                        )?;
                    }
                    None => deferred.push(config),
                }
            }
            if deferred.len() == before {
                let orphan = deferred[0];
                return Err(EphemerisError::UnknownParent {
                    body: orphan.name.clone(),
                    parent: orphan.parent.clone().unwrap_or_default(),
                });
            }
            pending = deferred;
        }

        log::info!(
            "loaded {} bodies rooted at `{}`",
            system.len(),
            system.body(system.root()).name()
        );
        Ok(system)
    }

    #[inline]
    pub fn root(&self) -> BodyId {
        BodyId(0)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Every id in insertion order; parents always precede their children.
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        (0..self.bodies.len()).map(BodyId)
    }

    /// Access a body. Ids are only minted by this system, so indexing cannot miss.
    pub fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id.0]
    }

    /// Case-insensitive name lookup.
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|body| body.name.eq_ignore_ascii_case(name))
            .map(BodyId)
    }

    pub fn lookup(&self, name: &str) -> Result<BodyId, EphemerisError> {
        self.find(name)
            .ok_or_else(|| EphemerisError::UnknownBody(name.to_string()))
    }

    pub fn parent(&self, id: BodyId) -> Option<BodyId> {
        self.body(id).parent
    }

    pub fn children(&self, id: BodyId) -> &[BodyId] {
        &self.body(id).children
    }

    pub fn primary(&self, id: BodyId) -> Primary {
        self.body(id).primary()
    }

    /// Number of ancestors between `id` and the root.
    pub fn depth(&self, id: BodyId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// State of `id` relative to its parent at global time `t`.
    pub fn state_vector(&self, id: BodyId, t: f64) -> StateVector {
        self.body(id).state_vector(t)
    }

    /// State of `id` relative to the root at global time `t`.
    pub fn global_state_vector(&self, id: BodyId, t: f64) -> StateVector {
        let mut state = StateVector::ZERO;
        let mut current = Some(id);
        while let Some(body) = current {
            state = state + self.state_vector(body, t);
            current = self.parent(body);
        }
        state
    }
}

fn definition_from_config(config: &BodyConfig) -> BodyDefinition {
    BodyDefinition {
        name: config.name.clone(),
        mu: config.mu,
        soi_radius: config.soi_radius.unwrap_or(f64::INFINITY),
        starting_t: config.starting_t,
    }
}

fn elements_from_config(orbit: &OrbitConfig) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: orbit.semi_major_axis,
        eccentricity: orbit.eccentricity,
        inclination: orbit.inclination_deg.to_radians(),
        ascending_node: orbit.ascending_node_deg.to_radians(),
        argument_of_periapsis: orbit.argument_of_periapsis_deg.to_radians(),
    }
}
