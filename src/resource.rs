//! Seam between the collector and the external cluster client.
//!
//! The collector never talks to the cluster itself. Callers wrap their
//! resource objects in these traits; a resource is "pod-like" when it can hand
//! out a [`PodLogSource`].

/// A cluster resource that a collection event is about.
pub trait ClusterResource {
    /// Resource kind, e.g. `Pod` or `VirtualMachine`
    fn kind(&self) -> &str;

    fn name(&self) -> &str;

    /// Namespace of namespaced resources, `None` for cluster-scoped ones
    fn namespace(&self) -> Option<&str>;

    /// Log retrieval capability, present only for pod-like resources
    fn as_pod_log_source(&self) -> Option<&dyn PodLogSource> {
        None
    }
}

/// Log retrieval for a pod-like resource.
#[cfg_attr(test, mockall::automock)]
pub trait PodLogSource {
    /// Names of the regular containers
    fn containers(&self) -> Vec<String>;

    /// Names of the init containers, `None` when the resource has no such notion
    fn init_containers(&self) -> Option<Vec<String>> {
        None
    }

    /// Full log stream of one container
    fn container_log(&self, container: &str) -> anyhow::Result<String>;
}

/// Short human readable identifier used in log messages.
pub fn describe(resource: &dyn ClusterResource) -> String {
    match resource.namespace() {
        Some(namespace) => format!("{} {}/{}", resource.kind(), namespace, resource.name()),
        None => format!("{} {}", resource.kind(), resource.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node;

    impl ClusterResource for Node {
        fn kind(&self) -> &str {
            "Node"
        }
        fn name(&self) -> &str {
            "worker-0"
        }
        fn namespace(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn test_describe_cluster_scoped() {
        assert_eq!(describe(&Node), "Node worker-0");
        assert!(Node.as_pod_log_source().is_none());
    }
}
