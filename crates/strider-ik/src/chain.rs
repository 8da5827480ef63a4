//! Kinematic chain: an origin followed by alternating joints and links.
//!
//! A [`Chain`] always starts with a [`Joint`] and strictly alternates
//! `Joint, Link, Joint, Link, ...`. Each joint's direction points along the
//! link that follows it, so the chain's pose is fully described by the origin
//! and the per-joint directions.

use serde::{Deserialize, Serialize};
use strider_core::ChainError;
use strider_math::Vector3;

use crate::joint::Joint;
use crate::link::Link;

/// One entry of a chain's element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainElement {
    Joint(Joint),
    Link(Link),
}

impl ChainElement {
    const fn label(&self) -> &'static str {
        match self {
            Self::Joint(_) => "joint",
            Self::Link(_) => "link",
        }
    }
}

impl From<Joint> for ChainElement {
    fn from(joint: Joint) -> Self {
        Self::Joint(joint)
    }
}

impl From<Link> for ChainElement {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

/// Solver working record for one joint/link pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkState {
    /// Index of the driving joint among the chain's joints.
    pub joint_index: usize,
    pub length: f64,
    pub start: Vector3,
    pub end: Vector3,
}

/// An ordered, append-only joint/link sequence anchored at an origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    name: Option<String>,
    origin: Vector3,
    elements: Vec<ChainElement>,
}

impl Chain {
    pub const fn new(origin: Vector3) -> Self {
        Self {
            name: None,
            origin,
            elements: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>, origin: Vector3) -> Self {
        Self {
            name: Some(name.into()),
            origin,
            elements: Vec::new(),
        }
    }

    /// Build a chain from `(joint, link)` pairs.
    pub fn from_segments(
        name: impl Into<String>,
        origin: Vector3,
        segments: impl IntoIterator<Item = (Joint, Link)>,
    ) -> Self {
        let mut chain = Self::named(name, origin);
        for (joint, link) in segments {
            chain.elements.push(ChainElement::Joint(joint));
            chain.elements.push(ChainElement::Link(link));
        }
        chain
    }

    /// Append an element.
    ///
    /// # Errors
    ///
    /// [`ChainError::OutOfOrder`] if the element breaks the joint/link
    /// alternation. The chain is left unchanged.
    pub fn add(&mut self, element: impl Into<ChainElement>) -> Result<&mut Self, ChainError> {
        let element = element.into();
        let expected = if self.elements.len() % 2 == 0 {
            "joint"
        } else {
            "link"
        };
        if element.label() != expected {
            return Err(ChainError::OutOfOrder {
                expected,
                got: element.label(),
            });
        }
        self.elements.push(element);
        Ok(self)
    }

    pub fn add_joint(&mut self, joint: Joint) -> Result<&mut Self, ChainError> {
        self.add(joint)
    }

    pub fn add_link(&mut self, link: Link) -> Result<&mut Self, ChainError> {
        self.add(link)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub const fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn elements(&self) -> &[ChainElement] {
        &self.elements
    }

    /// True when every joint is followed by a link.
    pub fn is_balanced(&self) -> bool {
        self.elements.len() % 2 == 0
    }

    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.elements.iter().filter_map(|e| match e {
            ChainElement::Joint(j) => Some(j),
            ChainElement::Link(_) => None,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.elements.iter().filter_map(|e| match e {
            ChainElement::Link(l) => Some(l),
            ChainElement::Joint(_) => None,
        })
    }

    pub fn link_count(&self) -> usize {
        self.elements.len() / 2
    }

    /// Sum of link lengths, i.e. the fully extended length.
    pub fn reach(&self) -> f64 {
        self.links().map(Link::length).sum()
    }

    /// Walk joint/link pairs outward from the origin.
    pub fn chain_state(&self) -> Vec<LinkState> {
        let mut cursor = self.origin;
        self.pairs()
            .enumerate()
            .map(|(joint_index, (joint, link))| {
                let start = cursor;
                let end = start + joint.direction() * link.length();
                cursor = end;
                LinkState {
                    joint_index,
                    length: link.length(),
                    start,
                    end,
                }
            })
            .collect()
    }

    /// Tip of the last link, or the origin for a chain with no links.
    pub fn end_effector(&self) -> Vector3 {
        self.chain_state()
            .last()
            .map_or(self.origin, |state| state.end)
    }

    pub fn joint_directions(&self) -> Vec<Vector3> {
        self.joints().map(Joint::direction).collect()
    }

    /// Check the chain can be solved.
    ///
    /// # Errors
    ///
    /// [`ChainError::Empty`] when the chain has no links.
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.link_count() == 0 {
            return Err(ChainError::Empty(
                self.name.clone().unwrap_or_else(|| "<unnamed>".into()),
            ));
        }
        Ok(())
    }

    fn pairs(&self) -> impl Iterator<Item = (&Joint, &Link)> {
        self.elements.chunks_exact(2).filter_map(|pair| match pair {
            [ChainElement::Joint(j), ChainElement::Link(l)] => Some((j, l)),
            _ => None,
        })
    }

    /// Overwrite joint directions in order. Extra directions are ignored.
    pub(crate) fn set_directions(&mut self, directions: &[Vector3]) {
        let joints = self.elements.iter_mut().filter_map(|e| match e {
            ChainElement::Joint(j) => Some(j),
            ChainElement::Link(_) => None,
        });
        for (joint, &direction) in joints.zip(directions) {
            joint.set_direction(direction);
        }
    }
}
