//! Registry of mappers keyed by target type
//!
//! Each target type owns at most one mapper. Mapping through the registry
//! registers the type on first use with its automapped schema.
//!
//! Copyright (c) 2025 Shapeshift Team
//! Licensed under the Apache-2.0 license

use crate::mapper::{compile_for, Mapper, Output, Target};
use crate::schema::Schema;
use crate::{Error, Result};
use log::debug;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;

struct Entry {
    type_name: &'static str,
    mapper: Box<dyn Any + Send + Sync>,
}

/// Mappers registered per target type
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` with `schema`, or with its automapped schema when `None`
    ///
    /// Fails if `T` already has a mapper.
    pub fn register<T: Target + 'static>(&mut self, schema: Option<Schema>) -> Result<Mapper<T>> {
        if self.exists::<T>() {
            return Err(Error::AlreadyRegistered {
                type_name: T::type_name().to_string(),
            });
        }
        let mapper = compile_for::<T>(&schema.unwrap_or_default())?;
        self.insert(mapper.clone());
        debug!("Registered mapper for {}", T::type_name());
        Ok(mapper)
    }

    /// Replace the schema of a registered type
    pub fn set_mapper<T: Target + 'static>(&mut self, schema: Schema) -> Result<Mapper<T>> {
        if !self.exists::<T>() {
            return Err(Error::NotRegistered {
                type_name: T::type_name().to_string(),
            });
        }
        let mapper = compile_for::<T>(&schema)?;
        self.insert(mapper.clone());
        debug!("Updated mapper for {}", T::type_name());
        Ok(mapper)
    }

    /// Map `data` into `T`, registering `T` first if needed
    pub fn map<T: Target + 'static>(&mut self, data: &Value) -> Result<Output<T>> {
        let mapper = match self.get_mapper::<T>() {
            Some(mapper) => mapper,
            None => self.register::<T>(None)?,
        };
        mapper.map(data)
    }

    pub fn get_mapper<T: Target + 'static>(&self) -> Option<Mapper<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.mapper.downcast_ref::<Mapper<T>>())
            .cloned()
    }

    /// Remove the mapper of `T`; returns whether one was registered
    pub fn delete_mapper<T: 'static>(&mut self) -> bool {
        let removed = self.entries.remove(&TypeId::of::<T>());
        if let Some(entry) = &removed {
            debug!("Deleted mapper for {}", entry.type_name);
        }
        removed.is_some()
    }

    pub fn exists<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Names of the registered target types, sorted
    pub fn mappers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert<T: Target + 'static>(&mut self, mapper: Mapper<T>) {
        self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                type_name: T::type_name(),
                mapper: Box::new(mapper),
            },
        );
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("mappers", &self.mappers()).finish()
    }
}
