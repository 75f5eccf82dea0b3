mod dedup_props;
