//! Fluent construction of [`RelNode`] trees.
//!
//! ```
//! use relsql::plan::{PlanBuilder, RowType, SortKey};
//! use relsql::rex::RexNode;
//! use relsql::types::SqlType;
//!
//! let b = PlanBuilder::scan(
//!     &["foodmart", "product"],
//!     RowType::of(&[("product_id", SqlType::integer()), ("brand_name", SqlType::varchar(60))]),
//! );
//! let cond = RexNode::gt(b.field("product_id"), RexNode::int(10));
//! let plan = b.filter(cond).sort(vec![SortKey::desc(0)]).build();
//! assert_eq!(plan.kind_name(), "Sort");
//! ```

use super::{
    AggCall, CorrelateKind, JoinKind, RelNode, RowType, SetOpKind, SortKey, WindowGroup,
};
use crate::rex::{CorrelationId, Literal, RexNode};

#[derive(Debug, Clone)]
pub struct PlanBuilder {
    node: RelNode,
}

impl PlanBuilder {
    pub fn scan(path: &[&str], row_type: RowType) -> Self {
        Self {
            node: RelNode::Scan {
                path: path.iter().map(|p| p.to_string()).collect(),
                row_type,
            },
        }
    }

    pub fn values(row_type: RowType, rows: Vec<Vec<Literal>>) -> Self {
        Self {
            node: RelNode::Values { row_type, rows },
        }
    }

    pub fn from_node(node: RelNode) -> Self {
        Self { node }
    }

    pub fn row_type(&self) -> RowType {
        self.node.row_type()
    }

    /// Reference to the current output field `name`.
    ///
    /// # Panics
    /// If no output field has that name.
    pub fn field(&self, name: &str) -> RexNode {
        RexNode::InputRef(self.index(name))
    }

    /// Ordinal of output field `name`, with the same panic as [`Self::field`].
    pub fn index(&self, name: &str) -> usize {
        let row_type = self.node.row_type();
        match row_type.index_of(name) {
            Some(i) => i,
            None => panic!(
                "field '{}' not found; available: {:?}",
                name,
                row_type.names()
            ),
        }
    }

    pub fn filter(self, condition: RexNode) -> Self {
        self.filter_correlated(Vec::new(), condition)
    }

    /// Filter whose subqueries may reference the current row through `variables`.
    pub fn filter_correlated(self, variables: Vec<CorrelationId>, condition: RexNode) -> Self {
        Self {
            node: RelNode::Filter {
                input: Box::new(self.node),
                condition,
                variables_set: variables,
            },
        }
    }

    pub fn project(self, exprs: Vec<(RexNode, &str)>) -> Self {
        let (exprs, names): (Vec<_>, Vec<_>) =
            exprs.into_iter().map(|(e, n)| (e, n.to_string())).unzip();
        Self {
            node: RelNode::Project {
                input: Box::new(self.node),
                exprs,
                names,
            },
        }
    }

    /// Project existing fields by name, keeping their names.
    pub fn project_fields(self, names: &[&str]) -> Self {
        let exprs = names.iter().map(|n| (self.field(n), *n)).collect();
        self.project(exprs)
    }

    pub fn aggregate(self, group_set: &[usize], calls: Vec<AggCall>) -> Self {
        Self {
            node: RelNode::Aggregate {
                input: Box::new(self.node),
                group_set: group_set.to_vec(),
                grouping_sets: None,
                calls,
            },
        }
    }

    pub fn aggregate_sets(
        self,
        group_set: &[usize],
        grouping_sets: Vec<Vec<usize>>,
        calls: Vec<AggCall>,
    ) -> Self {
        Self {
            node: RelNode::Aggregate {
                input: Box::new(self.node),
                group_set: group_set.to_vec(),
                grouping_sets: Some(grouping_sets),
                calls,
            },
        }
    }

    /// Join with `right`; `condition` addresses the concatenated row.
    pub fn join(self, kind: JoinKind, right: RelNode, condition: RexNode) -> Self {
        Self {
            node: RelNode::Join {
                kind,
                left: Box::new(self.node),
                right: Box::new(right),
                condition,
            },
        }
    }

    /// Equi-join on one field from each side.
    pub fn join_on(self, kind: JoinKind, right: RelNode, left_field: &str, right_field: &str) -> Self {
        let left_count = self.node.row_type().len();
        let left_ref = self.field(left_field);
        let right_index = match right.row_type().index_of(right_field) {
            Some(i) => i,
            None => panic!("field '{}' not found on right input", right_field),
        };
        let condition = RexNode::eq(left_ref, RexNode::InputRef(left_count + right_index));
        self.join(kind, right, condition)
    }

    pub fn set_op(self, kind: SetOpKind, all: bool, others: Vec<RelNode>) -> Self {
        let mut inputs = vec![self.node];
        inputs.extend(others);
        Self {
            node: RelNode::SetOp { kind, all, inputs },
        }
    }

    pub fn union(self, all: bool, other: RelNode) -> Self {
        self.set_op(SetOpKind::Union, all, vec![other])
    }

    pub fn sort(self, keys: Vec<SortKey>) -> Self {
        Self {
            node: RelNode::Sort {
                input: Box::new(self.node),
                keys,
                offset: None,
                fetch: None,
            },
        }
    }

    /// OFFSET/FETCH; merges into a directly preceding sort that has neither.
    pub fn limit(self, offset: Option<u64>, fetch: Option<u64>) -> Self {
        match self.node {
            RelNode::Sort {
                input,
                keys,
                offset: None,
                fetch: None,
            } => Self {
                node: RelNode::Sort {
                    input,
                    keys,
                    offset,
                    fetch,
                },
            },
            node => Self {
                node: RelNode::Sort {
                    input: Box::new(node),
                    keys: Vec::new(),
                    offset,
                    fetch,
                },
            },
        }
    }

    pub fn window(self, groups: Vec<WindowGroup>) -> Self {
        Self {
            node: RelNode::Window {
                input: Box::new(self.node),
                groups,
            },
        }
    }

    /// Lateral join: `right` may reference this row through `correlation_id`.
    pub fn correlate(self, kind: CorrelateKind, right: RelNode, correlation_id: CorrelationId) -> Self {
        Self {
            node: RelNode::Correlate {
                left: Box::new(self.node),
                right: Box::new(right),
                correlation_id,
                kind,
            },
        }
    }

    pub fn build(self) -> RelNode {
        self.node
    }
}
