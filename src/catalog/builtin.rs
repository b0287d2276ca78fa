//! Built-in landing zone audit queries.
//!
//! Used when no query config file is supplied.

use crate::models::{QueryCatalog, QueryDefinition};

struct BuiltinQuery {
    name: &'static str,
    description: &'static str,
    output_file: &'static str,
    query: &'static str,
}

const BUILTIN_QUERIES: &[BuiltinQuery] = &[
    BuiltinQuery {
        name: "resource_inventory",
        description: "Complete resource inventory",
        output_file: "inventory-full",
        query: r#"resources
| project
    name,
    type,
    resourceGroup,
    subscriptionId,
    location,
    sku = tostring(sku),
    kind,
    tags,
    id
| order by type asc, name asc"#,
    },
    BuiltinQuery {
        name: "resource_count_by_type",
        description: "Resource count by type",
        output_file: "inventory-by-type",
        query: r#"resources
| summarize ResourceCount = count() by type
| order by ResourceCount desc"#,
    },
    BuiltinQuery {
        name: "untagged_resources",
        description: "Resources without tags (governance gap)",
        output_file: "untagged-resources",
        query: r#"resources
| where isnull(tags) or tags == '{}'
| project name, type, resourceGroup, subscriptionId, location, id
| order by type asc"#,
    },
    BuiltinQuery {
        name: "storage_security",
        description: "Storage account security configuration (MCSB DP-3, NS-2)",
        output_file: "storage-security",
        query: r#"resources
| where type == 'microsoft.storage/storageaccounts'
| extend
    httpsOnly = properties.supportsHttpsTrafficOnly,
    minTlsVersion = properties.minimumTlsVersion,
    allowBlobPublicAccess = properties.allowBlobPublicAccess,
    networkDefaultAction = properties.networkAcls.defaultAction
| project
    name,
    resourceGroup,
    subscriptionId,
    location,
    httpsOnly,
    minTlsVersion,
    allowBlobPublicAccess,
    networkDefaultAction"#,
    },
    BuiltinQuery {
        name: "keyvault_config",
        description: "Key Vault configuration (MCSB DP-5, IM-1)",
        output_file: "keyvaults",
        query: r#"resources
| where type == 'microsoft.keyvault/vaults'
| extend
    enableRbacAuthorization = properties.enableRbacAuthorization,
    enableSoftDelete = properties.enableSoftDelete,
    enablePurgeProtection = properties.enablePurgeProtection,
    publicNetworkAccess = properties.publicNetworkAccess
| project
    name,
    resourceGroup,
    subscriptionId,
    enableRbacAuthorization,
    enableSoftDelete,
    enablePurgeProtection,
    publicNetworkAccess"#,
    },
    BuiltinQuery {
        name: "virtual_networks",
        description: "Virtual network inventory",
        output_file: "vnets",
        query: r#"resources
| where type == 'microsoft.network/virtualnetworks'
| extend
    addressSpace = properties.addressSpace.addressPrefixes,
    dnsServers = properties.dhcpOptions.dnsServers,
    subnets = array_length(properties.subnets)
| project
    name,
    resourceGroup,
    subscriptionId,
    location,
    addressSpace,
    dnsServers,
    subnets"#,
    },
    BuiltinQuery {
        name: "subnets_nsg_status",
        description: "Subnets with NSG attachment status (MCSB NS-1)",
        output_file: "subnets-nsg",
        query: r#"resources
| where type == 'microsoft.network/virtualnetworks'
| mv-expand subnet = properties.subnets
| extend
    subnetName = subnet.name,
    addressPrefix = subnet.properties.addressPrefix,
    nsgId = subnet.properties.networkSecurityGroup.id,
    hasNsg = isnotnull(subnet.properties.networkSecurityGroup.id)
| project
    vnetName = name,
    subnetName,
    addressPrefix,
    hasNsg,
    nsgId,
    resourceGroup,
    subscriptionId"#,
    },
    BuiltinQuery {
        name: "vnet_peerings",
        description: "VNet peering relationships",
        output_file: "peerings",
        query: r#"resources
| where type == 'microsoft.network/virtualnetworks'
| mv-expand peering = properties.virtualNetworkPeerings
| extend
    peeringName = peering.name,
    peeringState = peering.properties.peeringState,
    remoteVnet = peering.properties.remoteVirtualNetwork.id
| where isnotnull(peeringName)
| project
    vnetName = name,
    peeringName,
    peeringState,
    remoteVnet,
    resourceGroup,
    subscriptionId"#,
    },
    BuiltinQuery {
        name: "network_security_groups",
        description: "Network Security Groups inventory",
        output_file: "nsgs",
        query: r#"resources
| where type == 'microsoft.network/networksecuritygroups'
| project
    name,
    resourceGroup,
    subscriptionId,
    location,
    rulesCount = array_length(properties.securityRules),
    defaultRulesCount = array_length(properties.defaultSecurityRules)"#,
    },
    BuiltinQuery {
        name: "rbac_assignments",
        description: "RBAC role assignments",
        output_file: "rbac-assignments",
        query: r#"authorizationresources
| where type == 'microsoft.authorization/roleassignments'
| extend
    principalId = properties.principalId,
    principalType = properties.principalType,
    roleDefinitionId = properties.roleDefinitionId,
    scope = properties.scope
| project
    name,
    principalId,
    principalType,
    roleDefinitionId,
    scope"#,
    },
    BuiltinQuery {
        name: "managed_identities",
        description: "Resources with managed identities (MCSB IM-3)",
        output_file: "managed-identities",
        query: r#"resources
| where identity.type has 'SystemAssigned' or identity.type has 'UserAssigned'
| extend
    identityType = identity.type,
    principalId = identity.principalId
| project
    name,
    type,
    resourceGroup,
    subscriptionId,
    identityType,
    principalId"#,
    },
    BuiltinQuery {
        name: "sql_databases",
        description: "SQL Server and Database inventory",
        output_file: "sql-databases",
        query: r#"resources
| where type == 'microsoft.sql/servers/databases' or type == 'microsoft.sql/servers'
| extend
    minTlsVersion = properties.minimalTlsVersion,
    publicNetworkAccess = properties.publicNetworkAccess
| project
    name,
    type,
    resourceGroup,
    subscriptionId,
    location,
    minTlsVersion,
    publicNetworkAccess"#,
    },
    BuiltinQuery {
        name: "app_services",
        description: "App Service security configuration",
        output_file: "app-services",
        query: r#"resources
| where type == 'microsoft.web/sites'
| extend
    httpsOnly = properties.httpsOnly,
    minTlsVersion = properties.siteConfig.minTlsVersion,
    ftpsState = properties.siteConfig.ftpsState
| project
    name,
    resourceGroup,
    subscriptionId,
    location,
    kind,
    httpsOnly,
    minTlsVersion,
    ftpsState"#,
    },
    BuiltinQuery {
        name: "policy_assignments",
        description: "Azure Policy assignments",
        output_file: "policy-assignments",
        query: r#"policyresources
| where type == 'microsoft.authorization/policyassignments'
| extend
    displayName = properties.displayName,
    policyDefinitionId = properties.policyDefinitionId,
    scope = properties.scope,
    enforcementMode = properties.enforcementMode
| project
    name,
    displayName,
    policyDefinitionId,
    scope,
    enforcementMode,
    subscriptionId"#,
    },
    BuiltinQuery {
        name: "defender_assessments",
        description: "Defender for Cloud unhealthy assessments",
        output_file: "defender-findings",
        query: r#"securityresources
| where type == 'microsoft.security/assessments'
| extend
    displayName = properties.displayName,
    status = properties.status.code,
    severity = properties.metadata.severity,
    category = properties.metadata.categories[0]
| where status == 'Unhealthy'
| project
    displayName,
    status,
    severity,
    category,
    resourceId = properties.resourceDetails.Id,
    subscriptionId
| order by severity asc"#,
    },
    BuiltinQuery {
        name: "disk_encryption",
        description: "Disk encryption status (MCSB DP-4)",
        output_file: "disk-encryption",
        query: r#"resources
| where type == 'microsoft.compute/disks'
| extend
    encryptionType = properties.encryption.type,
    diskState = properties.diskState
| project
    name,
    resourceGroup,
    subscriptionId,
    location,
    encryptionType,
    diskState,
    sku = sku.name"#,
    },
    BuiltinQuery {
        name: "private_endpoints",
        description: "Private endpoints inventory (MCSB NS-2)",
        output_file: "private-endpoints",
        query: r#"resources
| where type == 'microsoft.network/privateendpoints'
| extend
    privateLinkServiceId = properties.privateLinkServiceConnections[0].properties.privateLinkServiceId,
    groupIds = properties.privateLinkServiceConnections[0].properties.groupIds
| project
    name,
    resourceGroup,
    subscriptionId,
    location,
    privateLinkServiceId,
    groupIds"#,
    },
    BuiltinQuery {
        name: "public_ips",
        description: "Public IP addresses (exposure analysis)",
        output_file: "public-ips",
        query: r#"resources
| where type == 'microsoft.network/publicipaddresses'
| extend
    ipAddress = properties.ipAddress,
    allocationMethod = properties.publicIPAllocationMethod,
    associatedResource = properties.ipConfiguration.id
| project
    name,
    resourceGroup,
    subscriptionId,
    location,
    ipAddress,
    allocationMethod,
    associatedResource"#,
    },
];

/// Catalog of the built-in queries, in declaration order.
pub fn builtin_catalog() -> QueryCatalog {
    BUILTIN_QUERIES
        .iter()
        .map(|q| {
            QueryDefinition::new(q.name, q.query)
                .with_description(q.description)
                .with_output_file(q.output_file)
        })
        .collect()
}
