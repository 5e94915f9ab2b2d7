//! Unit tests for the CassandraDatacenter resource

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_datacenter;
    use crate::*;
    use kube::CustomResourceExt;

    const MANIFEST: &str = r#"
apiVersion: cassandra.datastax.com/v1beta1
kind: CassandraDatacenter
metadata:
  name: dc1
  namespace: cass-operator
spec:
  clusterName: cluster1
  serverType: dse
  serverVersion: "6.8.0"
  size: 5
  racks:
    - name: r1
      zone: us-east-1a
    - name: r2
      zone: us-east-1b
  dseWorkloads:
    graphEnabled: true
  config:
    cassandra-yaml:
      num_tokens: 8
    jvm-server-options:
      initial_heap_size: "800M"
  storageConfig:
    cassandraDataVolumeClaimSpec:
      storageClassName: standard
      accessModes:
        - ReadWriteOnce
      resources:
        requests:
          storage: 5Gi
status:
  cassandraOperatorProgress: Ready
  nodeStatuses:
    cluster1-dc1-r1-sts-0:
      hostID: 5d3b1c4a
  nodeReplacements: []
  conditions:
    - type: Ready
      status: "True"
      lastTransitionTime: "2020-06-01T12:00:00Z"
"#;

    fn rack_names(dc: &CassandraDatacenter) -> Vec<String> {
        dc.racks().iter().map(|rack| rack.name.clone()).collect()
    }

    #[test]
    fn test_racks_default_when_empty() {
        let dc = create_test_datacenter("dc1", "cluster1");
        assert_eq!(rack_names(&dc), vec![DEFAULT_RACK_NAME]);
        assert!(dc.spec.racks.is_empty(), "default rack must not be written back");
    }

    #[test]
    fn test_racks_declared() {
        let mut dc = create_test_datacenter("dc1", "cluster1");
        dc.spec.racks = vec![Rack::new("r1"), Rack::new("r2")];
        assert_eq!(rack_names(&dc), vec!["r1", "r2"]);
    }

    #[test]
    fn test_node_counts_per_rack() {
        let mut dc = create_test_datacenter("dc1", "cluster1");
        dc.spec.size = 13;
        dc.spec.racks = ["r1", "r2", "r3", "r4", "r5"].into_iter().map(Rack::new).collect();

        let counts: Vec<(String, usize)> = dc
            .node_counts_per_rack()
            .into_iter()
            .map(|(rack, nodes)| (rack.name, nodes))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("r1".to_string(), 3),
                ("r2".to_string(), 3),
                ("r3".to_string(), 3),
                ("r4".to_string(), 2),
                ("r5".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_node_counts_default_rack_gets_everything() {
        let dc = create_test_datacenter("dc1", "cluster1");
        assert_eq!(dc.node_counts_per_rack(), vec![(Rack::new("default"), 3)]);
    }

    #[test]
    fn test_server_image_from_resource() {
        let mut dc = create_test_datacenter("dc1", "cluster1");
        let profile = DeploymentProfile::new();
        assert_eq!(dc.server_image(&profile).unwrap(), "datastax/cassandra-mgmtapi-3_11_6:v0.1.5");

        dc.spec.server_image = Some("jfrog.io:6789/dse-server-team/dse-server:6.8.0-123".to_string());
        dc.spec.server_version = "9000".to_string();
        assert_eq!(
            dc.server_image(&profile).unwrap(),
            "jfrog.io:6789/dse-server-team/dse-server:6.8.0-123"
        );
    }

    #[test]
    fn test_server_image_invalid_version() {
        let mut dc = create_test_datacenter("dc1", "cluster1");
        dc.spec.server_version = "9000".to_string();

        let err = dc.server_image(&DeploymentProfile::new()).unwrap_err();
        assert_eq!(err.to_string(), "server 'cassandra' and version '9000' do not work together");
    }

    #[test]
    fn test_config_builder_image_from_resource() {
        let mut dc = create_test_datacenter("dc1", "cluster1");
        assert_eq!(
            dc.config_builder_image(&DeploymentProfile::with_base_image_os("ubi7")),
            "datastax/cass-config-builder:1.0.1-ubi7"
        );

        dc.spec.config_builder_image = Some("local/builder:1".to_string());
        assert_eq!(dc.config_builder_image(&DeploymentProfile::new()), "local/builder:1");
    }

    #[test]
    fn test_service_names() {
        let dc = create_test_datacenter("dc1", "bob");
        assert_eq!(dc.seed_service_name(), "bob-seed-service");
        assert_eq!(dc.all_pods_service_name(), "bob-dc1-all-pods-service");
        assert_eq!(dc.datacenter_service_name(), "bob-dc1-service");
    }

    #[test]
    fn test_labels() {
        let dc = create_test_datacenter("dc1", "cluster1");

        let rack_labels = dc.rack_labels("r1");
        assert_eq!(rack_labels.len(), 3);
        assert_eq!(rack_labels.get(CLUSTER_LABEL).map(String::as_str), Some("cluster1"));
        assert_eq!(rack_labels.get(DATACENTER_LABEL).map(String::as_str), Some("dc1"));
        assert_eq!(rack_labels.get(RACK_LABEL).map(String::as_str), Some("r1"));

        assert_eq!(dc.datacenter_labels().len(), 2);
        assert_eq!(dc.cluster_labels().len(), 1);
    }

    #[test]
    fn test_superuser_secret() {
        let mut dc = create_test_datacenter("dc1", "cluster1");
        assert!(dc.should_generate_superuser_secret());
        let secret = dc.superuser_secret_ref();
        assert_eq!(secret.name.as_deref(), Some("cluster1-superuser"));
        assert_eq!(secret.namespace.as_deref(), Some("cass"));

        dc.spec.superuser_secret_name = Some("my-superuser".to_string());
        assert!(!dc.should_generate_superuser_secret());
        assert_eq!(dc.superuser_secret_ref().name.as_deref(), Some("my-superuser"));
    }

    #[test]
    fn test_manifest_deserializes() {
        let dc: CassandraDatacenter = serde_yaml::from_str(MANIFEST).unwrap();

        assert_eq!(dc.spec.server_type, ServerType::Dse);
        assert_eq!(dc.spec.size, 5);
        assert_eq!(dc.spec.racks[1].zone.as_deref(), Some("us-east-1b"));
        assert_eq!(dc.workload_flags(), WorkloadFlags { graph: 1, solr: 0, spark: 0 });
        assert!(dc.spec.storage_config.cassandra_data_volume_claim_spec.is_some());

        let status = dc.status.as_ref().unwrap();
        assert_eq!(status.cassandra_operator_progress, Some(ProgressState::Ready));
        assert_eq!(
            status.node_statuses["cluster1-dc1-r1-sts-0"].host_id.as_deref(),
            Some("5d3b1c4a")
        );
        assert_eq!(dc.condition_status(&DatacenterConditionType::READY), ConditionStatus::True);

        let config: serde_json::Value = serde_json::from_str(&dc.config_json().unwrap()).unwrap();
        assert_eq!(config["cassandra-yaml"]["num_tokens"], 8);
        assert_eq!(config["jvm-server-options"]["initial_heap_size"], "800M");
        assert_eq!(config["datacenter-info"]["graph-enabled"], 1);
    }

    #[test]
    fn test_spec_wire_names() {
        let dc: CassandraDatacenter = serde_yaml::from_str(MANIFEST).unwrap();
        let spec = serde_json::to_value(&dc.spec).unwrap();

        assert_eq!(spec["clusterName"], "cluster1");
        assert_eq!(spec["serverType"], "dse");
        assert_eq!(spec["dseWorkloads"]["graphEnabled"], true);
        assert_eq!(spec["config"]["cassandra-yaml"]["num_tokens"], 8);
        assert!(spec.get("serverImage").is_none());

        let reparsed: CassandraDatacenterSpec = serde_json::from_value(spec).unwrap();
        assert_eq!(reparsed, dc.spec);
    }

    #[test]
    fn test_crd_definition() {
        let crd = CassandraDatacenter::crd();
        assert_eq!(crd.spec.group, "cassandra.datastax.com");
        assert_eq!(crd.spec.names.kind, "CassandraDatacenter");
        assert_eq!(crd.spec.names.plural, "cassandradatacenters");
        assert_eq!(
            crd.spec.names.short_names,
            Some(vec!["cassdc".to_string(), "cassdcs".to_string()])
        );
        assert_eq!(crd.spec.scope, "Namespaced");

        let schema = serde_json::to_value(&crd.spec.versions[0].schema).unwrap();
        let versions = &schema["openAPIV3Schema"]["properties"]["spec"]["properties"]["serverVersion"]["enum"];
        assert_eq!(versions, &serde_json::json!(crate::images::SUPPORTED_SERVER_VERSIONS));
    }
}
