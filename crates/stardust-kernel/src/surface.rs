//! Presentation surface seam.
//!
//! The simulator never draws anything itself. It hands element descriptions
//! to a [`PresentationSurface`] and afterwards only mutates transform and
//! opacity through the handle it got back. Surface operations cannot fail.
//!
//! [`MemorySurface`] is a retained-mode implementation that keeps every live
//! element in creation order. The headless driver renders from it and the
//! tests inspect it.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use stardust_common::{Color, ElementHandle, Vec2, Viewport};
use tracing::trace;

use crate::ambient::FloatAnimation;

/// Visual class of an element, mirrored as a CSS class name on web surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementClass {
    /// Trail or pulse particle.
    #[default]
    Particle,
    /// Click explosion shard.
    Explosion,
    /// Ambient background particle.
    Background,
}

impl ElementClass {
    /// CSS class list for this element class.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Particle => "particle",
            Self::Explosion => "particle explosion-particle",
            Self::Background => "particle background-particle",
        }
    }
}

/// Soft halo drawn around an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Blur radius in pixels.
    pub blur: f32,
    /// Halo color.
    pub color: Color,
}

impl Glow {
    /// Glow sized for a particle: blur is twice the particle size.
    #[must_use]
    pub fn for_particle(size: f32, color: Color) -> Self {
        Self {
            blur: size * 2.0,
            color,
        }
    }
}

/// Placement of an element: translation plus optional rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// Top-left corner of the element in viewport pixels.
    pub translate: Vec2,
    /// Rotation in degrees, if the element spins.
    pub rotate_deg: Option<f32>,
}

impl Transform {
    /// Translation-only transform.
    #[must_use]
    pub const fn translate(translate: Vec2) -> Self {
        Self {
            translate,
            rotate_deg: None,
        }
    }

    /// Adds a rotation.
    #[must_use]
    pub const fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotate_deg = Some(degrees);
        self
    }

    /// CSS `transform` value for this placement.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = format!("translate({}px, {}px)", self.translate.x, self.translate.y);
        if let Some(deg) = self.rotate_deg {
            let _ = write!(css, " rotate({deg}deg)");
        }
        css
    }
}

/// Everything a surface needs to create an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    /// Visual class.
    pub class: ElementClass,
    /// Width and height in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
    /// Optional halo.
    pub glow: Option<Glow>,
    /// Initial opacity.
    pub opacity: f32,
    /// Initial placement.
    pub transform: Transform,
    /// Looping float animation, for background elements.
    pub animation: Option<FloatAnimation>,
}

/// The visible region the simulator attaches elements to.
pub trait PresentationSurface {
    /// Current viewport dimensions.
    fn viewport(&self) -> Viewport;

    /// Creates an element and returns its handle.
    fn create_element(&mut self, spec: &ElementSpec) -> ElementHandle;

    /// Destroys an element. Unknown handles are ignored.
    fn remove_element(&mut self, handle: ElementHandle);

    /// Updates an element's placement.
    fn set_transform(&mut self, handle: ElementHandle, transform: Transform);

    /// Updates an element's opacity.
    fn set_opacity(&mut self, handle: ElementHandle, opacity: f32);

    /// Asks for a callback on the next display refresh.
    fn request_frame(&mut self);
}

/// Live state of an element in a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    /// Creation parameters; `transform` and `opacity` track later updates.
    pub spec: ElementSpec,
}

impl ElementState {
    /// Current placement.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.spec.transform
    }

    /// Current opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.spec.opacity
    }
}

/// Retained-mode in-memory surface.
#[derive(Debug, Default)]
pub struct MemorySurface {
    viewport: Viewport,
    elements: BTreeMap<ElementHandle, ElementState>,
    next_handle: u64,
    created: u64,
    removed: u64,
    frame_requested: bool,
}

impl MemorySurface {
    /// Creates an empty surface with the given viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Looks up a live element.
    #[must_use]
    pub fn element(&self, handle: ElementHandle) -> Option<&ElementState> {
        self.elements.get(&handle)
    }

    /// Live elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementHandle, &ElementState)> {
        self.elements.iter().map(|(h, e)| (*h, e))
    }

    /// Number of live elements.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.elements.len()
    }

    /// Total elements ever created.
    #[must_use]
    pub const fn created_count(&self) -> u64 {
        self.created
    }

    /// Total elements ever removed.
    #[must_use]
    pub const fn removed_count(&self) -> u64 {
        self.removed
    }

    /// Whether a refresh has been requested and not yet taken.
    #[must_use]
    pub const fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Consumes a pending refresh request, returning whether there was one.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }
}

impl PresentationSurface for MemorySurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn create_element(&mut self, spec: &ElementSpec) -> ElementHandle {
        self.next_handle += 1;
        let handle = ElementHandle::from_raw(self.next_handle);
        self.elements
            .insert(handle, ElementState { spec: spec.clone() });
        self.created += 1;
        handle
    }

    fn remove_element(&mut self, handle: ElementHandle) {
        if self.elements.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            trace!("Ignoring removal of unknown element {:?}", handle);
        }
    }

    fn set_transform(&mut self, handle: ElementHandle, transform: Transform) {
        if let Some(element) = self.elements.get_mut(&handle) {
            element.spec.transform = transform;
        }
    }

    fn set_opacity(&mut self, handle: ElementHandle, opacity: f32) {
        if let Some(element) = self.elements.get_mut(&handle) {
            element.spec.opacity = opacity;
        }
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}
