mod aot_transform_walker_spec;
