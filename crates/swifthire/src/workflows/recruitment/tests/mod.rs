mod common;
mod profiles;
mod routing;
mod support;
