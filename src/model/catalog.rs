//! The static operating model: every node, link and scenario the map shows.

use super::types::{FlowStep, KindStat, Link, NodeData, NodeDetails, NodeKind, Scenario};

const fn node(
	id: &'static str,
	label: &'static str,
	kind: NodeKind,
	description: &'static str,
	color: &'static str,
	icon: &'static str,
) -> NodeData {
	NodeData {
		id,
		label,
		kind,
		description,
		color,
		icon,
		context_file: None,
		details: None,
	}
}

const fn agent(
	id: &'static str,
	label: &'static str,
	description: &'static str,
	icon: &'static str,
	context_file: &'static str,
	mission: &'static str,
	skills_used: &'static [&'static str],
	connectors_used: &'static [&'static str],
	special: Option<&'static str>,
) -> NodeData {
	NodeData {
		id,
		label,
		kind: NodeKind::SubAgent,
		description,
		color: "blue",
		icon,
		context_file: Some(context_file),
		details: Some(NodeDetails {
			mission: Some(mission),
			skills_used,
			connectors_used,
			special,
		}),
	}
}

const fn skill(id: &'static str, label: &'static str, description: &'static str, icon: &'static str) -> NodeData {
	node(id, label, NodeKind::Skill, description, "emerald", icon)
}

const fn connector(id: &'static str, label: &'static str, description: &'static str, icon: &'static str) -> NodeData {
	node(id, label, NodeKind::Connector, description, "amber", icon)
}

/// Every node on the map.
pub static NODES: &[NodeData] = &[
	NodeData {
		id: "main-agent",
		label: "Cursor Main Agent",
		kind: NodeKind::Orchestrator,
		description: "Orchestrator: Delegates to sub-agents and uses core tools. Click to run scenarios.",
		color: "violet",
		icon: "Bot",
		context_file: Some("sys_orchestrator.md"),
		details: None,
	},
	agent(
		"cosmos-dba",
		"CosmosDB DBA",
		"Manage CosmosDB structure and data operations safely.",
		"Database",
		"dba_guidelines.md",
		"Safe DB Operations",
		&["Cosmos CLI Wrapper", "CosmosDB Data Ops", "Data Export"],
		&["Azure MCP", "GitHub MCP"],
		Some("Requires Human Validation"),
	),
	agent(
		"devops-agent",
		"DevOps Agent",
		"CI/CD, Infrastructure, Testing.",
		"Container",
		"cicd_pipelines.md",
		"Infrastructure & Deployment",
		&["Azure CLI Wrapper"],
		&["Azure MCP"],
		None,
	),
	agent(
		"product-manager",
		"Recipe PM",
		"Analyze Use Cases, write specs, manage backlog.",
		"NotebookPen",
		"product_specs.md",
		"Product Specs & Backlog",
		&["Notion Backlog", "Foundry Persona"],
		&["Notion MCP", "Azure MCP"],
		None,
	),
	agent(
		"secretaire",
		"Secretary",
		"Team communication and administration.",
		"Mail",
		"comms_policy.md",
		"Comms & Admin",
		&["Email Sender", "Team Directory"],
		&["GitHub MCP"],
		None,
	),
	agent(
		"streamlit-designer",
		"Streamlit Designer",
		"Create interfaces, design UI/UX.",
		"Palette",
		"ui_design_system.md",
		"Frontend Implementation",
		&[],
		&[],
		None,
	),
	skill(
		"cosmosdb-cli-wrapper",
		"Cosmos CLI Wrapper",
		"Encapsule les commandes Azure CLI pour explorer la structure CosmosDB : comptes, bases SQL, conteneurs. Pour diagnostiquer la configuration, lister les bases et conteneurs, et consulter la métadonnée. Préconfiguré pour le projet (azneco1rec001, recipes-db).",
		"Terminal",
	),
	skill(
		"cosmosdb-data-ops",
		"CosmosDB Data Ops",
		"Gère les opérations CRUD sur les items CosmosDB via le SDK Python azure-cosmos : lecture, création, mise à jour, suppression. Utilise DefaultAzureCredential. Toute modification doit être validée par un humain avant exécution.",
		"Activity",
	),
	skill(
		"data-export",
		"Data Export",
		"Exporte des données en CSV ou Excel avec pandas et openpyxl. Crée des fichiers dans orusRecipies/exports/ à partir de listes de dictionnaires ou de DataFrames. Utilisable pour rapports, extractions et partage de données.",
		"FileText",
	),
	skill(
		"azure-cli-wrapper",
		"Azure CLI Wrapper",
		"Encapsule les commandes Azure CLI (az) pour interroger l'infrastructure Azure : listes de Container Apps, images ACR, statut de déploiement, logs. Nécessite az login et un fichier .env configuré.",
		"Terminal",
	),
	skill(
		"notion-backlog",
		"Notion Backlog",
		"Centralise les opérations sur le backlog produit Notion (features, use cases) via le MCP Notion. Permet de lister, créer, modifier et lire les entrées. Toute modification doit être validée par un humain.",
		"RefreshCw",
	),
	skill(
		"foundry-persona",
		"Foundry Persona",
		"Consulte des personas synthétiques via Azure AI Foundry pour valider des hypothèses produit ou tester des specs. Personas : Chef Culinaire, Nutritionniste, Manager de Site, Responsable Qualité.",
		"Users",
	),
	skill(
		"email-sender",
		"Email Sender",
		"Envoie des emails via l'API Power Automate (HTTP trigger). Utilise un corps HTML. Doit être utilisé uniquement après validation du contenu par l'utilisateur.",
		"Send",
	),
	skill(
		"team-directory",
		"Team Directory",
		"Gère l'annuaire d'équipe (docs/team-directory.md) : consultation et modification des contacts (nom, email, rôle, équipe, style de communication). Toute modification doit être validée par un humain avant écriture.",
		"Book",
	),
	connector("mcp-azure", "Azure MCP", "Full Cloud Control", "Cloud"),
	connector("mcp-notion", "Notion MCP", "Knowledge Base API", "Book"),
	connector("mcp-github", "GitHub MCP", "Code Repository", "Github"),
	connector("mcp-gemini", "Gemini MCP", "LLM Intelligence", "Sparkles"),
	connector("mcp-browser", "Browser MCP", "Web Access", "Globe"),
];

/// Directed calls between nodes.
pub static LINKS: &[Link] = &[
	// Orchestrator to sub-agents
	Link::new("main-agent", "cosmos-dba"),
	Link::new("main-agent", "devops-agent"),
	Link::new("main-agent", "product-manager"),
	Link::new("main-agent", "secretaire"),
	Link::new("main-agent", "streamlit-designer"),
	// Orchestrator to core connectors
	Link::new("main-agent", "mcp-github"),
	Link::new("main-agent", "mcp-gemini"),
	// Sub-agents to skills
	Link::new("cosmos-dba", "cosmosdb-cli-wrapper"),
	Link::new("cosmos-dba", "cosmosdb-data-ops"),
	Link::new("cosmos-dba", "data-export"),
	Link::new("devops-agent", "azure-cli-wrapper"),
	Link::new("product-manager", "notion-backlog"),
	Link::new("product-manager", "foundry-persona"),
	Link::new("secretaire", "email-sender"),
	Link::new("secretaire", "team-directory"),
	// Skills to connectors
	Link::new("cosmosdb-cli-wrapper", "mcp-azure"),
	Link::new("cosmosdb-data-ops", "mcp-azure"),
	Link::new("azure-cli-wrapper", "mcp-azure"),
	Link::new("foundry-persona", "mcp-azure"),
	Link::new("notion-backlog", "mcp-notion"),
	// directory lives in docs/, exports land in the repo
	Link::new("team-directory", "mcp-github"),
	Link::new("data-export", "mcp-github"),
];

const fn step(label: &'static str, from: &'static str, to: &'static str, description: &'static str) -> FlowStep {
	FlowStep {
		label,
		from,
		to,
		description,
	}
}

/// Authored flows for the scenario player.
pub static SCENARIOS: &[Scenario] = &[
	Scenario {
		id: "feature-spec",
		title: "Create Feature Spec",
		description: "Round-trip: From Main Agent to Notion creation and back.",
		steps: &[
			step("Delegation", "main-agent", "product-manager", "Main Agent processes user request and delegates to PM Agent."),
			step("Skill Call", "product-manager", "notion-backlog", "PM invokes Notion Backlog skill."),
			step("API Req", "notion-backlog", "mcp-notion", "Skill calls Notion API via MCP to create page."),
			step("API Res", "mcp-notion", "notion-backlog", "Notion API confirms page creation."),
			step("Skill Return", "notion-backlog", "product-manager", "Skill returns new page URL to PM."),
			step("Report", "product-manager", "main-agent", "PM confirms task completion to Main Agent."),
		],
	},
	Scenario {
		id: "check-deployment",
		title: "Check Deployment Status",
		description: "DevOps Agent inspects Azure resources via CLI.",
		steps: &[
			step("Delegation", "main-agent", "devops-agent", "Main Agent requests infrastructure status report."),
			step("CLI Call", "devops-agent", "azure-cli-wrapper", "DevOps invokes Azure CLI Wrapper."),
			step("Execute", "azure-cli-wrapper", "mcp-azure", "Wrapper executes \"az container app list\"."),
			step("Data", "mcp-azure", "azure-cli-wrapper", "Azure returns JSON status of containers."),
			step("Analysis", "azure-cli-wrapper", "devops-agent", "Skill parses JSON and reports health."),
			step("Report", "devops-agent", "main-agent", "DevOps confirms environment is healthy."),
		],
	},
	Scenario {
		id: "db-maintenance",
		title: "Secure DB Maintenance",
		description: "Multi-skill: DBA Agent checks metrics then runs optimization.",
		steps: &[
			step("Request", "main-agent", "cosmos-dba", "Main Agent requests database optimization."),
			step("Check", "cosmos-dba", "cosmosdb-cli-wrapper", "DBA checks current health via CLI skill."),
			step("Fetch", "cosmosdb-cli-wrapper", "mcp-azure", "CLI requests metrics from Azure MCP."),
			step("Data", "mcp-azure", "cosmosdb-cli-wrapper", "Azure returns high latency metrics."),
			step("Report", "cosmosdb-cli-wrapper", "cosmos-dba", "CLI reports health issues to DBA."),
			step("Action", "cosmos-dba", "cosmosdb-data-ops", "DBA triggers optimization routine."),
			step("Execute", "cosmosdb-data-ops", "mcp-azure", "Data Ops runs scaling command on Azure."),
			step("Confirm", "mcp-azure", "cosmosdb-data-ops", "Azure confirms scaling complete."),
			step("Done", "cosmosdb-data-ops", "cosmos-dba", "Optimization finished."),
			step("Final", "cosmos-dba", "main-agent", "Maintenance complete, system healthy."),
		],
	},
];

/// Looks a node up by id.
pub fn find_node(id: &str) -> Option<&'static NodeData> {
	NODES.iter().find(|n| n.id == id)
}

/// Looks a scenario up by id.
pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
	SCENARIOS.iter().find(|s| s.id == id)
}

/// Node counts per kind, in column order.
pub fn composition(nodes: &[NodeData]) -> Vec<KindStat> {
	NodeKind::ALL
		.iter()
		.map(|&kind| KindStat {
			kind,
			count: nodes.iter().filter(|n| n.kind == kind).count(),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn test_node_ids_are_unique() {
		let ids: HashSet<_> = NODES.iter().map(|n| n.id).collect();
		assert_eq!(ids.len(), NODES.len());
	}

	#[test]
	fn test_links_reference_known_nodes() {
		for link in LINKS {
			assert!(find_node(link.source).is_some(), "{}", link.source);
			assert!(find_node(link.target).is_some(), "{}", link.target);
		}
	}

	#[test]
	fn test_scenario_steps_reference_known_nodes() {
		for scenario in SCENARIOS {
			for step in scenario.steps {
				assert!(find_node(step.from).is_some(), "{}", step.from);
				assert!(find_node(step.to).is_some(), "{}", step.to);
			}
		}
	}

	#[test]
	fn test_composition_counts() {
		let counts: Vec<usize> = composition(NODES).iter().map(|s| s.count).collect();
		assert_eq!(counts, vec![1, 5, 8, 5]);
	}

	#[test]
	fn test_feature_spec_shape() {
		let flow = find_scenario("feature-spec").unwrap();
		assert_eq!(flow.title, "Create Feature Spec");
		assert_eq!(flow.steps.len(), 6);
		assert!(find_scenario("nope").is_none());
	}
}
