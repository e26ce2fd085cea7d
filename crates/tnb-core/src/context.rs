//! Ambient arguments for `Convert` nodes.
//!
//! A [`ConversionContext`] is an immutable stack of frames. Pushing a frame
//! returns a new context and leaves the caller's untouched, so the matching
//! pop is simply the derived context going out of scope, whatever the exit
//! path. Contexts are `Send + Sync` and cheap to clone.

use std::any::TypeId;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::schema::Target;

/// Identity of a conversion target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Type(TypeId),
    Named(String),
}

impl TargetKey {
    pub fn of<T: 'static>() -> Self {
        Self::Type(TypeId::of::<T>())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

/// Extra constructor arguments supplied by the caller rather than the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ambient {
    args: Vec<Value>,
    kwargs: Map<String, Value>,
}

impl Ambient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}

struct Frame {
    key: TargetKey,
    ambient: Ambient,
    parent: Option<Arc<Frame>>,
}

#[derive(Clone, Default)]
pub struct ConversionContext {
    top: Option<Arc<Frame>>,
}

impl ConversionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with `ambient` registered for `target` on top of this one.
    pub fn with_scope(&self, target: &Target, ambient: Ambient) -> Self {
        self.with_key(target.key().clone(), ambient)
    }

    pub fn with<T: 'static>(&self, ambient: Ambient) -> Self {
        self.with_key(TargetKey::of::<T>(), ambient)
    }

    pub fn with_key(&self, key: TargetKey, ambient: Ambient) -> Self {
        Self {
            top: Some(Arc::new(Frame {
                key,
                ambient,
                parent: self.top.clone(),
            })),
        }
    }

    /// Runs `body` inside a scope for `target`.
    pub fn scoped<R>(
        &self,
        target: &Target,
        ambient: Ambient,
        body: impl FnOnce(&ConversionContext) -> R,
    ) -> R {
        body(&self.with_scope(target, ambient))
    }

    /// Most recently registered ambient arguments for `key`.
    pub fn lookup(&self, key: &TargetKey) -> Option<&Ambient> {
        let mut frame = self.top.as_deref();
        while let Some(current) = frame {
            if &current.key == key {
                return Some(&current.ambient);
            }
            frame = current.parent.as_deref();
        }
        None
    }

    pub fn depth(&self) -> usize {
        std::iter::successors(self.top.as_deref(), |frame| frame.parent.as_deref()).count()
    }
}

impl std::fmt::Debug for ConversionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        let mut frame = self.top.as_deref();
        while let Some(current) = frame {
            list.entry(&current.key);
            frame = current.parent.as_deref();
        }
        list.finish()
    }
}
