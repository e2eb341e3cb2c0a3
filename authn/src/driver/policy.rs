// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Role-based access rules and the driver's `authorize` method.

use crate::driver::AuthnDriver;
use crate::model::{Principal, Role};
use animes_core::driver::{DriverError, DriverResult};
use http::Method;

/// Pattern segment that matches any single path segment.
const ANY_SEGMENT: &str = "*";

/// Pattern suffix that matches the prefix itself and anything below it.
const ANY_SUFFIX: &str = "/**";

/// A rule that restricts the APIs under a path pattern to a set of roles.
#[derive(Clone, Debug)]
pub struct AccessRule {
    /// HTTP method the rule applies to, or `None` for any method.
    method: Option<Method>,

    /// Path pattern, made of literal segments and `*` wildcards, optionally ending in `/**`.
    pattern: String,

    /// Roles allowed to access the matching APIs.  Empty means any authenticated user.
    roles: Vec<Role>,
}

impl AccessRule {
    /// Creates a rule for any method on paths matching `pattern` that only requires the caller
    /// to be authenticated.
    pub fn new<P: Into<String>>(pattern: P) -> Self {
        Self { method: None, pattern: pattern.into(), roles: vec![] }
    }

    /// Modifies the rule to only apply to `method`.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Modifies the rule to require any of the `roles`.
    pub fn with_roles(mut self, roles: &[Role]) -> Self {
        self.roles = roles.to_vec();
        self
    }

    /// Returns true if the rule applies to a request for `method` on `path`.
    fn matches(&self, method: &Method, path: &str) -> bool {
        if let Some(exp_method) = &self.method {
            if exp_method != method {
                return false;
            }
        }

        let path = path.trim_end_matches('/');
        match self.pattern.strip_suffix(ANY_SUFFIX) {
            Some(prefix) => {
                let prefix_len = prefix.split('/').count();
                let segments = path.split('/').collect::<Vec<&str>>();
                segments.len() >= prefix_len && segments_match(prefix, &segments[..prefix_len])
            }
            None => {
                let segments = path.split('/').collect::<Vec<&str>>();
                segments.len() == self.pattern.split('/').count()
                    && segments_match(&self.pattern, &segments)
            }
        }
    }
}

/// Returns true if every segment of `pattern` matches the corresponding one in `segments`.
///
/// Both sides must have the same number of segments.
fn segments_match(pattern: &str, segments: &[&str]) -> bool {
    pattern
        .split('/')
        .zip(segments)
        .all(|(exp, actual)| (exp == ANY_SEGMENT && !actual.is_empty()) || exp == *actual)
}

/// An ordered list of access rules where the first matching rule wins.
///
/// Requests that do not match any rule only require the caller to be authenticated.
#[derive(Clone, Debug, Default)]
pub struct SecurityPolicy {
    /// Rules in evaluation order.
    rules: Vec<AccessRule>,
}

impl SecurityPolicy {
    /// Creates a new policy from an ordered list of `rules`.
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Returns the roles that grant access to `method` on `path`, where an empty set means that
    /// any authenticated user is allowed.
    pub fn required_roles(&self, method: &Method, path: &str) -> &[Role] {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| rule.roles.as_slice())
            .unwrap_or_default()
    }
}

impl AuthnDriver {
    /// Checks if `principal` is allowed to issue a request for `method` on `path`.
    pub fn authorize(self, principal: &Principal, method: &Method, path: &str) -> DriverResult<()> {
        let roles = self.policy.required_roles(method, path);
        if roles.is_empty() || principal.has_any_role(roles) {
            Ok(())
        } else {
            Err(DriverError::Unauthorized(format!(
                "{} {} requires one of the roles {}",
                method,
                path,
                roles.iter().copied().map(Role::name).collect::<Vec<&str>>().join(",")
            )))
        }
    }
}
