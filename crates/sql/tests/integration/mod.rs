mod features;
mod grouping;
mod joins;
mod null_ordering;
mod robustness;
mod scenarios;
mod scopes;
mod set_ops;
