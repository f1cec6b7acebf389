/*
[INPUT]:  Requested path and current identity state
[OUTPUT]: Route to render after access guards
[POS]:    Navigation layer - page table and redirects
[UPDATE]: When pages or guard rules change
*/

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Connect,
    Dashboard,
    Issue,
    Verify,
    Revoke,
    Profile,
    Login,
    Register,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Home,
        Route::Connect,
        Route::Dashboard,
        Route::Issue,
        Route::Verify,
        Route::Revoke,
        Route::Profile,
        Route::Login,
        Route::Register,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Connect => "/connect",
            Route::Dashboard => "/dashboard",
            Route::Issue => "/issue",
            Route::Verify => "/verify",
            Route::Revoke => "/revoke",
            Route::Profile => "/profile",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Connect => "Connect Wallet",
            Route::Dashboard => "Dashboard",
            Route::Issue => "Issue Certificate",
            Route::Verify => "Verify Certificate",
            Route::Revoke => "Revoke Certificate",
            Route::Profile => "My Profile",
            Route::Login => "Login",
            Route::Register => "Register",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

/// Identity facts the guards look at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessState {
    pub wallet_connected: bool,
    pub signed_in: bool,
}

impl AccessState {
    pub fn is_authenticated(&self) -> bool {
        self.wallet_connected || self.signed_in
    }
}

/// Apply the page guards; returns the route that should actually render
pub fn resolve(route: Route, access: AccessState) -> Route {
    match route {
        Route::Dashboard | Route::Issue | Route::Revoke if !access.is_authenticated() => {
            Route::Login
        }
        Route::Profile if !access.is_authenticated() => Route::Connect,
        Route::Connect if access.is_authenticated() => Route::Dashboard,
        Route::Login | Route::Register if access.signed_in => Route::Dashboard,
        other => other,
    }
}
