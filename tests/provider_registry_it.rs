#![cfg(feature = "reqwest")]

// self
use wecom_sso::{
	auth::ProviderId,
	error::{ConfigError, Error},
	provider::{AuthProvider, ProviderRegistry},
	wecom::{AGENT_ID_KEY, ReqwestWecomProvider},
};

#[test]
fn builtin_registry_creates_unconfigured_wecom() {
	let registry = ProviderRegistry::with_builtin().expect("Built-in registry should build.");

	assert!(registry.contains("wecom"));

	let mut provider = registry.create("wecom").expect("WeCom should be registered.");

	assert_eq!(provider.name(), "wecom");
	assert_eq!(provider.display_name(), "企业微信");
	assert!(provider.config().client_id.is_empty());
	assert!(provider.config().client_secret.is_none());

	provider.config_mut().set_client_id("ww-corp");
	provider.config_mut().set_extra(AGENT_ID_KEY, "1000002");

	let url = provider.build_authorization_url("s1");
	let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

	assert!(pairs.contains(&("appid".into(), "ww-corp".into())));
	assert!(pairs.contains(&("agentid".into(), "1000002".into())));
}

#[test]
fn unknown_names_are_config_errors() {
	let registry = ProviderRegistry::new();

	assert!(matches!(
		registry.create("wecom"),
		Err(Error::Config(ConfigError::UnknownProvider { ref name })) if name == "wecom"
	));
}

#[test]
fn registering_twice_replaces_the_factory() {
	let registry = ProviderRegistry::with_builtin().expect("Built-in registry should build.");
	let id = ProviderId::new("wecom").expect("Identifier should be valid.");
	let previous = registry.register(id, || {
		Ok(Box::new(
			ReqwestWecomProvider::new()?.with_client_id("ww-preset"),
		) as Box<dyn AuthProvider>)
	});

	assert!(previous.is_some());
	assert_eq!(registry.names().len(), 1);

	let provider = registry.create("wecom").expect("Replacement should be used.");

	assert_eq!(provider.config().client_id, "ww-preset");
}

#[test]
fn created_instances_are_independent() {
	let registry = ProviderRegistry::with_builtin().expect("Built-in registry should build.");
	let mut first = registry.create("wecom").expect("WeCom should be registered.");
	let second = registry.create("wecom").expect("WeCom should be registered.");

	first.config_mut().set_client_id("ww-first");

	assert!(second.config().client_id.is_empty());
}
